/*!
 * Deadlock Detection and Recovery
 *
 * Detection is a global check: the system is deadlocked when at least one
 * process is waiting and every process that has not terminated is waiting.
 * Partial deadlocks, where some processes are still runnable, are not seen.
 *
 * Recovery terminates victims in creation order, returning everything they
 * hold to the pool and re-running the waiting-queue drain after each one,
 * until the predicate no longer holds.
 */

use super::manager::ResourceManager;
use crate::core::types::Pid;
use crate::core::Name;
use crate::monitoring::{Event, EventLog};
use crate::process::{ProcessState, ProcessTable, RunQueues};
use tracing::{info, warn};

/// Whether every live process is blocked
pub fn is_deadlocked(processes: &ProcessTable) -> bool {
    let mut waiting = 0usize;
    for process in processes.iter() {
        match process.state() {
            ProcessState::Terminated => {}
            ProcessState::Waiting => waiting += 1,
            _ => return false,
        }
    }
    waiting > 0
}

/// Names of waiting processes, in creation order
pub fn waiting_names(processes: &ProcessTable) -> Vec<Name> {
    processes
        .iter()
        .filter(|p| p.state() == ProcessState::Waiting)
        .map(|p| p.name().clone())
        .collect()
}

/// Outcome of one recovery
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recovery {
    /// Terminated processes, in termination order
    pub victims: Vec<Pid>,
    /// Processes moved to the ready queue by the drains between victims
    pub promoted: Vec<Pid>,
}

impl Recovery {
    pub fn is_empty(&self) -> bool {
        self.victims.is_empty()
    }
}

impl ResourceManager {
    /// Break a global deadlock, if there is one.
    ///
    /// Returns an empty `Recovery` when the system was not deadlocked.
    pub fn recover(
        &mut self,
        processes: &mut ProcessTable,
        queues: &mut RunQueues,
        events: &mut EventLog,
    ) -> Recovery {
        let mut recovery = Recovery::default();
        if !is_deadlocked(processes) {
            return recovery;
        }

        let waiting = waiting_names(processes);
        warn!(waiting = waiting.len(), "deadlock detected");
        events.push(Event::DeadlockDetected { waiting });

        while is_deadlocked(processes) {
            let Some(pid) = processes
                .iter()
                .find(|p| p.state() == ProcessState::Waiting)
                .map(|p| p.pid())
            else {
                break;
            };
            let Some(victim) = processes.get_mut(pid) else {
                break;
            };

            let released: Vec<Name> = self
                .table
                .release_all(victim)
                .into_iter()
                .filter_map(|id| self.table.get(id).map(|r| r.name.clone()))
                .collect();
            // The victim stays in the waiting queue until the next drain drops it
            queues.to_terminated(victim);

            info!(
                victim = %victim.name(),
                released = released.len(),
                "terminated deadlock victim"
            );
            events.push(Event::VictimTerminated {
                process: victim.name().clone(),
                released,
                available: self.table.available_names(),
            });
            recovery.victims.push(pid);

            let promoted = self.drain_waiting(processes, queues);
            recovery.promoted.extend(promoted);
        }

        recovery
    }
}
