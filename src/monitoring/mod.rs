/*!
 * Monitoring
 * Event log of instruction outcomes and structured tracing
 */

mod events;
mod tracer;

pub use events::{Event, EventLog, MailboxOp, ResourceOp};
pub use tracer::{generate_run_id, init_tracing, RunSpan};
