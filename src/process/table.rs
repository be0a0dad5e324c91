/*!
 * Process Table
 * Per-process control records indexed by pid
 */

use super::types::{Instruction, ProcessState};
use crate::core::types::{InstanceId, Pid};
use crate::core::Name;
use serde::Serialize;
use std::sync::Arc;
use tracing::trace;

/// Process control block
///
/// The instruction stream is shared and immutable; progress is tracked by
/// `cursor`, which only ever moves forward.
#[derive(Debug, Clone, Serialize)]
pub struct Process {
    pid: Pid,
    name: Name,
    state: ProcessState,
    instructions: Arc<[Instruction]>,
    cursor: usize,
    held: Vec<InstanceId>,
}

impl Process {
    pub fn new(pid: Pid, name: Name, instructions: Arc<[Instruction]>) -> Self {
        Self {
            pid,
            name,
            state: ProcessState::New,
            instructions,
            cursor: 0,
            held: Vec::new(),
        }
    }

    #[inline]
    pub fn pid(&self) -> Pid {
        self.pid
    }

    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    #[inline]
    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Index of the next instruction to execute
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Instruction at the cursor, `None` once the stream is exhausted
    pub fn pending(&self) -> Option<&Instruction> {
        self.instructions.get(self.cursor)
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.instructions.len()
    }

    pub fn remaining(&self) -> usize {
        self.instructions.len().saturating_sub(self.cursor)
    }

    /// Whether the last instruction of the stream is a release
    pub fn ends_with_release(&self) -> bool {
        matches!(self.instructions.last(), Some(Instruction::Release { .. }))
    }

    /// Resource instances currently held, in acquisition order
    pub fn held(&self) -> &[InstanceId] {
        &self.held
    }

    /// Consume the pending instruction
    pub(crate) fn advance(&mut self) {
        if self.cursor < self.instructions.len() {
            self.cursor += 1;
        }
    }

    pub(crate) fn set_state(&mut self, to: ProcessState) {
        debug_assert!(
            self.state.can_transition_to(to),
            "invalid transition for {}: {} -> {}",
            self.name,
            self.state,
            to
        );
        if self.state != to {
            trace!(process = %self.name, from = %self.state, to = %to, "state change");
        }
        self.state = to;
    }

    pub(crate) fn hold(&mut self, instance: InstanceId) {
        self.held.push(instance);
    }

    /// Drop an instance from the held set; returns whether it was there
    pub(crate) fn unhold(&mut self, instance: InstanceId) -> bool {
        match self.held.iter().position(|&id| id == instance) {
            Some(pos) => {
                self.held.remove(pos);
                true
            }
            None => false,
        }
    }

    pub(crate) fn take_held(&mut self) -> Vec<InstanceId> {
        std::mem::take(&mut self.held)
    }
}

/// All processes, in creation order (pid == index)
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ProcessTable {
    processes: Vec<Process>,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a process with the next pid
    pub fn spawn(&mut self, name: Name, instructions: Arc<[Instruction]>) -> Pid {
        let pid = self.processes.len() as Pid;
        self.processes.push(Process::new(pid, name, instructions));
        pid
    }

    #[inline]
    pub fn get(&self, pid: Pid) -> Option<&Process> {
        self.processes.get(pid as usize)
    }

    #[inline]
    pub fn get_mut(&mut self, pid: Pid) -> Option<&mut Process> {
        self.processes.get_mut(pid as usize)
    }

    pub fn find(&self, name: &str) -> Option<&Process> {
        self.processes.iter().find(|p| p.name == *name)
    }

    /// Iterate in creation order
    pub fn iter(&self) -> impl Iterator<Item = &Process> + '_ {
        self.processes.iter()
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn count_in(&self, state: ProcessState) -> usize {
        self.processes.iter().filter(|p| p.state == state).count()
    }
}
