/*!
 * Resource Manager
 * Acquire/release on behalf of processes and waiting-queue promotion
 */

use super::table::{Acquire, Release, ResourceTable};
use crate::core::types::Pid;
use crate::core::Name;
use crate::process::{Instruction, Process, ProcessTable, RunQueues};
use tracing::debug;

/// Owns the resource table and the policies that act on it
#[derive(Debug, Clone, Default)]
pub struct ResourceManager {
    pub(super) table: ResourceTable,
}

impl ResourceManager {
    pub fn new(table: ResourceTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &ResourceTable {
        &self.table
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.table.contains(name)
    }

    pub fn acquire(&mut self, process: &mut Process, name: &str) -> Acquire {
        self.table.acquire(process, name)
    }

    pub fn release(&mut self, process: &mut Process, name: &str) -> Release {
        self.table.release(process, name)
    }

    pub fn available_names(&self) -> Vec<Name> {
        self.table.available_names()
    }

    /// Re-examine every process waiting at call time, exactly once.
    ///
    /// A process whose pending request could now be satisfied moves to the
    /// ready queue; the others go back to the tail of the waiting queue in
    /// their original relative order. Processes re-enqueued during this pass
    /// are not looked at again. Terminated entries (deadlock victims still
    /// sitting in the queue) are dropped.
    ///
    /// Returns the promoted pids in promotion order.
    pub fn drain_waiting(&self, processes: &mut ProcessTable, queues: &mut RunQueues) -> Vec<Pid> {
        let mut promoted = Vec::new();
        let pass = queues.waiting.len();

        for _ in 0..pass {
            let Some(pid) = queues.waiting.dequeue() else {
                break;
            };
            let Some(process) = processes.get_mut(pid) else {
                continue;
            };
            if process.state().is_terminated() {
                continue;
            }

            let satisfiable = match process.pending().and_then(Instruction::blocking_resource) {
                Some(resource) => self.table.is_available(resource),
                None => true,
            };

            if satisfiable {
                debug!(process = %process.name(), "promoted from waiting queue");
                queues.to_ready(process);
                promoted.push(pid);
            } else {
                queues.waiting.enqueue(pid);
            }
        }

        promoted
    }
}
