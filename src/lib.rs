/*!
 * Process Simulation Kernel
 * Cooperative scheduling, resource allocation, deadlock recovery and
 * single-slot mailboxes, exposed as a library
 */

pub mod config;
pub mod core;
pub mod ipc;
pub mod loader;
pub mod monitoring;
pub mod process;
pub mod resources;
pub mod scheduler;

// Re-exports
pub use crate::core::errors::{
    ConfigError, ExchangeError, KernelError, KernelResult, LoadError, LoadResult, SimError,
    SyntaxError,
};
pub use crate::core::types::{InstanceId, Pid, Quantum};
pub use crate::core::Name;
pub use config::{OutputFormat, RunConfig};
pub use ipc::{MailboxTable, Received};
pub use loader::{load_file, parse_str, LoadedModel, ModelBuilder, ProcessSpec};
pub use monitoring::{init_tracing, Event, EventLog, MailboxOp, ResourceOp, RunSpan};
pub use process::{Instruction, Process, ProcessState, ProcessTable, Queue, RunQueues};
pub use resources::{is_deadlocked, ResourceManager, ResourceTable};
pub use scheduler::{
    schedule_processes, RunOutcome, Scheduler, SchedulerConfig, SchedulerStats, SchedulingPolicy,
    Turn, TurnEnd,
};
