/*!
 * Scheduler
 * Drives instruction execution under FCFS or round-robin policy
 *
 * Single-threaded and cooperative: one process executes at a time, for up to
 * one quantum of instructions (round robin) or its whole stream (FCFS). The
 * scheduler owns the process table, the three queues, the resource and
 * mailbox tables and the event log for the duration of a run.
 */

use crate::core::types::Pid;
use crate::core::Name;
use crate::ipc::MailboxTable;
use crate::loader::LoadedModel;
use crate::monitoring::EventLog;
use crate::process::{Process, ProcessTable, RunQueues};
use crate::resources::{ResourceManager, ResourceTable};
use tracing::info;

mod dispatch;
mod operations;
mod stats;
pub mod types;

pub use stats::SchedulerStats;
pub use types::{RunOutcome, SchedulerConfig, SchedulingPolicy, Turn, TurnEnd};

/// Process scheduler over one loaded model
#[derive(Debug, Clone)]
pub struct Scheduler {
    config: SchedulerConfig,
    processes: ProcessTable,
    queues: RunQueues,
    resources: ResourceManager,
    mailboxes: MailboxTable,
    events: EventLog,
    stats: SchedulerStats,
    /// Set once an FCFS process blocks; no further turns run
    stalled: Option<(Pid, Name)>,
}

impl Scheduler {
    /// Create process control blocks for every definition and file them to
    /// the ready queue in creation order
    pub fn new(model: &LoadedModel, config: SchedulerConfig) -> Self {
        let mut processes = ProcessTable::new();
        let mut queues = RunQueues::new();

        for spec in model.processes() {
            let pid = processes.spawn(spec.name.clone(), spec.instructions.clone());
            if let Some(process) = processes.get_mut(pid) {
                queues.to_ready(process);
            }
        }

        info!(
            policy = %config.policy,
            quantum = config.effective_quantum(),
            processes = processes.len(),
            resources = model.resources().len(),
            mailboxes = model.mailboxes().len(),
            "scheduler initialized"
        );

        Self {
            config,
            processes,
            queues,
            resources: ResourceManager::new(ResourceTable::new(model.resources().iter().cloned())),
            mailboxes: MailboxTable::new(model.mailboxes().iter().cloned()),
            events: EventLog::new(),
            stats: SchedulerStats::default(),
            stalled: None,
        }
    }

    pub fn config(&self) -> SchedulerConfig {
        self.config
    }

    pub fn process(&self, pid: Pid) -> Option<&Process> {
        self.processes.get(pid)
    }

    pub fn process_by_name(&self, name: &str) -> Option<&Process> {
        self.processes.find(name)
    }

    pub fn processes(&self) -> &ProcessTable {
        &self.processes
    }

    pub fn resources(&self) -> &ResourceTable {
        self.resources.table()
    }

    pub fn mailboxes(&self) -> &MailboxTable {
        &self.mailboxes
    }

    pub fn queues(&self) -> &RunQueues {
        &self.queues
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn into_events(self) -> EventLog {
        self.events
    }
}

/// Run every process in `model` to completion and return the event log
///
/// A zero quantum selects the default of one instruction per turn. Under
/// FCFS the quantum is ignored, and a process that blocks halts the run
/// (the log then ends with a stall event).
pub fn schedule_processes(
    model: &LoadedModel,
    policy: SchedulingPolicy,
    quantum: u32,
) -> EventLog {
    let mut scheduler = Scheduler::new(model, SchedulerConfig::new(policy, quantum));
    scheduler.run();
    scheduler.into_events()
}
