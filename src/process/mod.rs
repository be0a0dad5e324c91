/*!
 * Process Module
 * Process control blocks, instruction streams and scheduling queues
 */

pub mod lifecycle;
pub mod queue;
pub mod table;
pub mod types;

// Re-export for convenience
pub use lifecycle::RunQueues;
pub use queue::{ProcessQueue, Queue};
pub use table::{Process, ProcessTable};
pub use types::{Instruction, ProcessState};
