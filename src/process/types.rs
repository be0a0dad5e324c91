/*!
 * Process Types
 * Lifecycle states and the instruction set
 */

use crate::core::Name;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Process state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Created by the loader, not yet filed to the ready queue
    New,
    /// Queued for a turn
    Ready,
    /// Currently executing instructions
    Running,
    /// Blocked on a resource request
    Waiting,
    /// Finished, or chosen as a deadlock victim
    Terminated,
}

impl ProcessState {
    /// Whether the lifecycle allows moving from `self` to `to`.
    ///
    /// Staying in the same state is always allowed (a running process
    /// executes several instructions per turn).
    pub fn can_transition_to(self, to: ProcessState) -> bool {
        use ProcessState::*;
        if self == to {
            return true;
        }
        matches!(
            (self, to),
            (New, Ready)
                | (Ready, Running)
                | (Running, Ready)
                | (Running, Waiting)
                | (Running, Terminated)
                | (Waiting, Ready)
                | (Waiting, Terminated)
        )
    }

    pub fn is_terminated(self) -> bool {
        self == ProcessState::Terminated
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProcessState::New => "new",
            ProcessState::Ready => "ready",
            ProcessState::Running => "running",
            ProcessState::Waiting => "waiting",
            ProcessState::Terminated => "terminated",
        };
        f.write_str(s)
    }
}

/// One step of a process's instruction stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Instruction {
    /// Acquire one free instance of a resource class
    Request { resource: Name },
    /// Return one held instance of a resource class
    Release { resource: Name },
    /// Overwrite a mailbox slot
    Send { mailbox: Name, message: Name },
    /// Take the message out of a mailbox slot
    Receive {
        mailbox: Name,
        /// Variable name from the definition file; informational only
        #[serde(default, skip_serializing_if = "Option::is_none")]
        binding: Option<Name>,
    },
}

impl Instruction {
    pub fn request(resource: impl Into<Name>) -> Self {
        Instruction::Request {
            resource: resource.into(),
        }
    }

    pub fn release(resource: impl Into<Name>) -> Self {
        Instruction::Release {
            resource: resource.into(),
        }
    }

    pub fn send(mailbox: impl Into<Name>, message: impl Into<Name>) -> Self {
        Instruction::Send {
            mailbox: mailbox.into(),
            message: message.into(),
        }
    }

    pub fn receive(mailbox: impl Into<Name>) -> Self {
        Instruction::Receive {
            mailbox: mailbox.into(),
            binding: None,
        }
    }

    /// Resource class this instruction waits on, if it can block
    pub fn blocking_resource(&self) -> Option<&Name> {
        match self {
            Instruction::Request { resource } => Some(resource),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Request { resource } => write!(f, "req {}", resource),
            Instruction::Release { resource } => write!(f, "rel {}", resource),
            Instruction::Send { mailbox, message } => write!(f, "send ({}, {})", mailbox, message),
            Instruction::Receive { mailbox, binding } => match binding {
                Some(var) => write!(f, "recv ({}, {})", mailbox, var),
                None => write!(f, "recv ({})", mailbox),
            },
        }
    }
}
