/*!
 * Loaded Model
 * Immutable description of processes, resources and mailboxes for one run
 */

use crate::core::errors::{LoadError, LoadResult};
use crate::core::Name;
use crate::process::Instruction;
use ahash::AHashSet;
use serde::Serialize;
use std::sync::Arc;

/// One process definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessSpec {
    pub name: Name,
    pub instructions: Arc<[Instruction]>,
}

/// Everything the scheduler needs, built once and shared by reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadedModel {
    processes: Vec<ProcessSpec>,
    resources: Vec<Name>,
    mailboxes: Vec<Name>,
}

impl LoadedModel {
    pub fn builder() -> ModelBuilder {
        ModelBuilder::new()
    }

    /// Process definitions in creation order
    pub fn processes(&self) -> &[ProcessSpec] {
        &self.processes
    }

    /// Resource instance names in table order; repeats are extra instances
    pub fn resources(&self) -> &[Name] {
        &self.resources
    }

    pub fn mailboxes(&self) -> &[Name] {
        &self.mailboxes
    }

    pub fn instruction_count(&self) -> usize {
        self.processes.iter().map(|p| p.instructions.len()).sum()
    }
}

/// Builder for `LoadedModel`
#[derive(Debug, Default)]
pub struct ModelBuilder {
    processes: Vec<ProcessSpec>,
    resources: Vec<Name>,
    mailboxes: Vec<Name>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_process<I>(mut self, name: impl Into<Name>, instructions: I) -> Self
    where
        I: IntoIterator<Item = Instruction>,
    {
        self.processes.push(ProcessSpec {
            name: name.into(),
            instructions: instructions.into_iter().collect::<Vec<_>>().into(),
        });
        self
    }

    /// Add one resource instance
    pub fn with_resource(mut self, name: impl Into<Name>) -> Self {
        self.resources.push(name.into());
        self
    }

    /// Add `count` instances of one resource class
    pub fn with_resources(mut self, name: impl Into<Name>, count: usize) -> Self {
        let name = name.into();
        self.resources
            .extend(std::iter::repeat(name).take(count));
        self
    }

    pub fn with_mailbox(mut self, name: impl Into<Name>) -> Self {
        self.mailboxes.push(name.into());
        self
    }

    pub fn build(self) -> LoadResult<LoadedModel> {
        let mut seen = AHashSet::new();
        for spec in &self.processes {
            if !seen.insert(spec.name.as_str()) {
                return Err(LoadError::DuplicateProcess(spec.name.clone()));
            }
        }

        let mut seen = AHashSet::new();
        for name in &self.mailboxes {
            if !seen.insert(name.as_str()) {
                return Err(LoadError::DuplicateMailbox(name.clone()));
            }
        }

        Ok(LoadedModel {
            processes: self.processes,
            resources: self.resources,
            mailboxes: self.mailboxes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_order() {
        let model = LoadedModel::builder()
            .with_resource("R1")
            .with_resources("R2", 2)
            .with_mailbox("M")
            .with_process("P1", [Instruction::request("R1")])
            .with_process("P2", [])
            .build()
            .unwrap();

        assert_eq!(
            model.resources().iter().map(Name::as_str).collect::<Vec<_>>(),
            vec!["R1", "R2", "R2"]
        );
        assert_eq!(model.processes()[1].name, "P2");
        assert_eq!(model.instruction_count(), 1);
    }

    #[test]
    fn test_duplicate_process_rejected() {
        let err = LoadedModel::builder()
            .with_process("P1", [])
            .with_process("P1", [])
            .build()
            .unwrap_err();
        assert!(matches!(err, LoadError::DuplicateProcess(name) if name == "P1"));
    }

    #[test]
    fn test_duplicate_mailbox_rejected() {
        let err = LoadedModel::builder()
            .with_mailbox("M")
            .with_mailbox("M")
            .build()
            .unwrap_err();
        assert!(matches!(err, LoadError::DuplicateMailbox(_)));
    }
}
