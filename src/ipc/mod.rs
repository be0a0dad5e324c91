/*!
 * IPC Module
 * Inter-process message exchange
 */

pub mod mailbox;

pub use mailbox::{ExchangeResult, Mailbox, MailboxTable, Received};
