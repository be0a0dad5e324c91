/*!
 * Process Lifecycle
 * Moves processes between the ready, waiting and terminated queues
 *
 * Every filing operation sets the process state and enqueues it in one step,
 * so a process that is not currently executing is always a member of exactly
 * one queue and its state matches that queue.
 */

use super::queue::ProcessQueue;
use super::table::Process;
use super::types::ProcessState;
use serde::Serialize;
use tracing::trace;

/// The three scheduling queues
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunQueues {
    pub ready: ProcessQueue,
    pub waiting: ProcessQueue,
    pub terminated: ProcessQueue,
}

impl RunQueues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_ready(&mut self, process: &mut Process) {
        process.set_state(ProcessState::Ready);
        self.ready.enqueue(process.pid());
        trace!(process = %process.name(), "filed to ready queue");
    }

    pub fn to_waiting(&mut self, process: &mut Process) {
        process.set_state(ProcessState::Waiting);
        self.waiting.enqueue(process.pid());
        trace!(process = %process.name(), "filed to waiting queue");
    }

    pub fn to_terminated(&mut self, process: &mut Process) {
        process.set_state(ProcessState::Terminated);
        self.terminated.enqueue(process.pid());
        trace!(process = %process.name(), "filed to terminated queue");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Name;
    use crate::process::types::Instruction;

    #[test]
    fn test_filing_sets_state() {
        let mut queues = RunQueues::new();
        let mut process = Process::new(4, Name::from("P5"), Vec::<Instruction>::new().into());

        queues.to_ready(&mut process);
        assert_eq!(process.state(), ProcessState::Ready);
        assert_eq!(queues.ready.peek(), Some(&4));

        queues.ready.dequeue();
        process.set_state(ProcessState::Running);
        queues.to_waiting(&mut process);
        assert_eq!(process.state(), ProcessState::Waiting);
        assert_eq!(queues.waiting.len(), 1);

        queues.to_terminated(&mut process);
        assert!(process.state().is_terminated());
        assert_eq!(queues.terminated.peek(), Some(&4));
    }
}
