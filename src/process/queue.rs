/*!
 * FIFO Queue
 * First-in-first-out queue used for the ready, waiting and terminated sets
 */

use crate::core::types::Pid;
use serde::Serialize;
use std::collections::VecDeque;

/// FIFO queue.
///
/// Insertion order is the fairness basis for scheduling and for waiting-queue
/// retries, so there is no priority and no reordering.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Queue<T> {
    items: VecDeque<T>,
}

/// Queue of process references
pub type ProcessQueue = Queue<Pid>;

impl<T> Queue<T> {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    /// Append to the tail - O(1)
    #[inline]
    pub fn enqueue(&mut self, item: T) {
        self.items.push_back(item);
    }

    /// Pop the oldest item - O(1), `None` when empty
    #[inline]
    pub fn dequeue(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.items.front()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate head to tail
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.items.iter()
    }
}

impl<T: PartialEq> Queue<T> {
    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = ProcessQueue::new();
        queue.enqueue(3);
        queue.enqueue(1);
        queue.enqueue(2);

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.dequeue(), Some(3));
        assert_eq!(queue.dequeue(), Some(1));
        assert_eq!(queue.dequeue(), Some(2));
        assert_eq!(queue.dequeue(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_requeue_goes_to_tail() {
        let mut queue: Queue<&str> = ["a", "b"].into_iter().collect();
        let head = queue.dequeue().unwrap();
        queue.enqueue(head);
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(queue.peek(), Some(&"b"));
        assert!(queue.contains(&"a"));
    }
}
