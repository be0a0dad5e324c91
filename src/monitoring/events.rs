/*!
 * Event System
 * Strongly-typed record of every instruction outcome, in execution order
 *
 * `Display` renders the line format consumers of the simulator rely on,
 * e.g. `P1 req R1: acquired; Available: R2 R3`.
 */

use crate::core::Name;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource instruction kind, as written in process definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceOp {
    Request,
    Release,
}

impl fmt::Display for ResourceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceOp::Request => "req",
            ResourceOp::Release => "rel",
        })
    }
}

/// Mailbox instruction kind, as written in process definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MailboxOp {
    Send,
    Receive,
}

impl fmt::Display for MailboxOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MailboxOp::Send => "send",
            MailboxOp::Receive => "recv",
        })
    }
}

/// Observable simulator event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    // Resource events
    RequestBlocked {
        process: Name,
        resource: Name,
    },
    Acquired {
        process: Name,
        resource: Name,
        available: Vec<Name>,
    },
    Released {
        process: Name,
        resource: Name,
        available: Vec<Name>,
    },
    NothingToRelease {
        process: Name,
        resource: Name,
    },
    UnknownResource {
        process: Name,
        op: ResourceOp,
        resource: Name,
    },

    // Mailbox events
    MessageSent {
        process: Name,
        mailbox: Name,
        message: Name,
    },
    MessageReceived {
        process: Name,
        mailbox: Name,
        message: Name,
    },
    MailboxEmpty {
        process: Name,
        mailbox: Name,
    },
    UnknownMailbox {
        process: Name,
        op: MailboxOp,
        mailbox: Name,
    },

    // Scheduler transitions
    DeadlockDetected {
        waiting: Vec<Name>,
    },
    VictimTerminated {
        process: Name,
        released: Vec<Name>,
        available: Vec<Name>,
    },
    Stalled {
        process: Name,
        resource: Name,
    },
}

impl Event {
    /// Process the event is about, if any
    pub fn process(&self) -> Option<&Name> {
        match self {
            Event::RequestBlocked { process, .. }
            | Event::Acquired { process, .. }
            | Event::Released { process, .. }
            | Event::NothingToRelease { process, .. }
            | Event::UnknownResource { process, .. }
            | Event::MessageSent { process, .. }
            | Event::MessageReceived { process, .. }
            | Event::MailboxEmpty { process, .. }
            | Event::UnknownMailbox { process, .. }
            | Event::VictimTerminated { process, .. }
            | Event::Stalled { process, .. } => Some(process),
            Event::DeadlockDetected { .. } => None,
        }
    }

    /// Whether the event reports a defect in the process definition
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Event::NothingToRelease { .. }
                | Event::UnknownResource { .. }
                | Event::UnknownMailbox { .. }
        )
    }
}

struct Names<'a>(&'a [Name]);

impl fmt::Display for Names<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::RequestBlocked { process, resource } => {
                write!(f, "{} req {}: waiting;", process, resource)
            }
            Event::Acquired {
                process,
                resource,
                available,
            } => write!(
                f,
                "{} req {}: acquired; Available: {}",
                process,
                resource,
                Names(available)
            ),
            Event::Released {
                process,
                resource,
                available,
            } => write!(
                f,
                "{} rel {}: released; Available: {}",
                process,
                resource,
                Names(available)
            ),
            Event::NothingToRelease { process, resource } => {
                write!(f, "{} rel {}: ERROR: Nothing to release", process, resource)
            }
            Event::UnknownResource {
                process,
                op,
                resource,
            } => write!(f, "{} {} {}: ERROR: Unknown resource", process, op, resource),
            Event::MessageSent {
                process,
                mailbox,
                message,
            } => write!(f, "{} send: Message {} added to {}", process, message, mailbox),
            Event::MessageReceived {
                process,
                mailbox,
                message,
            } => write!(
                f,
                "{} recv: Message {} removed from {}",
                process, message, mailbox
            ),
            Event::MailboxEmpty { process, mailbox } => {
                write!(f, "{} recv: No message in {}", process, mailbox)
            }
            Event::UnknownMailbox {
                process,
                op,
                mailbox,
            } => write!(f, "{} {}: ERROR: Unknown mailbox {}", process, op, mailbox),
            Event::DeadlockDetected { waiting } => {
                write!(f, "DEADLOCK: {} waiting", Names(waiting))
            }
            Event::VictimTerminated {
                process, available, ..
            } => write!(
                f,
                "{} terminated to recover from deadlock; Available: {}",
                process,
                Names(available)
            ),
            Event::Stalled { process, resource } => {
                write!(f, "{} req {}: stalled under FCFS", process, resource)
            }
        }
    }
}

/// Ordered event record of one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn last(&self) -> Option<&Event> {
        self.events.last()
    }

    /// Events concerning one process, in order
    pub fn for_process<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Event> + 'a {
        self.events
            .iter()
            .filter(move |e| e.process().is_some_and(|p| p == name))
    }

    /// Rendered lines, one per event
    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(ToString::to_string).collect()
    }

    /// Newline-terminated text rendering
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for event in &self.events {
            out.push_str(&event.to_string());
            out.push('\n');
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
