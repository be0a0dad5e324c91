/*!
 * Mailboxes
 * Single-slot message exchange between processes
 *
 * Each mailbox holds at most one pending message. A send overwrites whatever
 * is in the slot, so an unread message is lost; a receive takes the message
 * out or reports the slot empty. Neither operation blocks.
 */

use crate::core::errors::ExchangeError;
use crate::core::Name;
use ahash::AHashMap;
use serde::Serialize;

pub type ExchangeResult<T> = Result<T, ExchangeError>;

/// A named single-message slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mailbox {
    pub name: Name,
    pub slot: Option<Name>,
}

/// Result of a receive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received {
    Message(Name),
    Empty,
}

impl Received {
    pub fn message(&self) -> Option<&Name> {
        match self {
            Received::Message(message) => Some(message),
            Received::Empty => None,
        }
    }
}

/// Mailboxes in load order, with a name index
#[derive(Debug, Clone, Default, Serialize)]
pub struct MailboxTable {
    mailboxes: Vec<Mailbox>,
    #[serde(skip)]
    by_name: AHashMap<Name, usize>,
}

impl MailboxTable {
    /// Build from mailbox names, all initially empty.
    /// A repeated name refers to the first mailbox of that name.
    pub fn new<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Name>,
    {
        let mut table = Self::default();
        for name in names {
            let name = name.into();
            if table.by_name.contains_key(name.as_str()) {
                continue;
            }
            table.by_name.insert(name.clone(), table.mailboxes.len());
            table.mailboxes.push(Mailbox { name, slot: None });
        }
        table
    }

    pub fn get(&self, name: &str) -> Option<&Mailbox> {
        self.by_name.get(name).map(|&idx| &self.mailboxes[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mailbox> + '_ {
        self.mailboxes.iter()
    }

    pub fn len(&self) -> usize {
        self.mailboxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mailboxes.is_empty()
    }

    /// Put `message` in the slot, returning any unread message it replaced
    pub fn send(&mut self, name: &str, message: Name) -> ExchangeResult<Option<Name>> {
        let mailbox = self.slot_mut(name)?;
        Ok(mailbox.slot.replace(message))
    }

    /// Take the message out of the slot
    pub fn receive(&mut self, name: &str) -> ExchangeResult<Received> {
        let mailbox = self.slot_mut(name)?;
        Ok(match mailbox.slot.take() {
            Some(message) => Received::Message(message),
            None => Received::Empty,
        })
    }

    fn slot_mut(&mut self, name: &str) -> ExchangeResult<&mut Mailbox> {
        match self.by_name.get(name) {
            Some(&idx) => Ok(&mut self.mailboxes[idx]),
            None => Err(ExchangeError::UnknownMailbox(Name::from(name))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_then_empty() {
        let mut table = MailboxTable::new(["M"]);
        assert_eq!(table.send("M", Name::from("X")), Ok(None));
        assert_eq!(table.receive("M"), Ok(Received::Message(Name::from("X"))));
        assert_eq!(table.receive("M"), Ok(Received::Empty));
    }

    #[test]
    fn test_send_overwrites_unread_message() {
        let mut table = MailboxTable::new(["M"]);
        table.send("M", Name::from("first")).unwrap();
        assert_eq!(
            table.send("M", Name::from("second")),
            Ok(Some(Name::from("first")))
        );
        assert_eq!(table.get("M").unwrap().slot, Some(Name::from("second")));
        assert_eq!(
            table.receive("M").unwrap().message(),
            Some(&Name::from("second"))
        );
    }

    #[test]
    fn test_unknown_mailbox() {
        let mut table = MailboxTable::new(["M1", "M2", "M1"]);
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.send("M3", Name::from("x")),
            Err(ExchangeError::UnknownMailbox(Name::from("M3")))
        );
        assert!(table.receive("M3").is_err());
    }

    #[test]
    fn test_mailboxes_are_independent() {
        let mut table = MailboxTable::new(["A", "B"]);
        table.send("A", Name::from("for-a")).unwrap();
        assert_eq!(table.receive("B"), Ok(Received::Empty));
        assert_eq!(table.iter().filter(|m| m.slot.is_some()).count(), 1);
    }
}
