/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use super::name::Name;
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Conditions raised while a process executes an instruction.
///
/// None of these abort a run: the scheduler records them in the event log,
/// traces them, and moves the process on to its next instruction.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SimError {
    #[error("{process} does not hold {resource}")]
    #[diagnostic(
        code(resource::not_held),
        help("Release instructions must follow a matching request in the same process.")
    )]
    ResourceNotHeld { process: Name, resource: Name },

    #[error("Unknown resource: {0}")]
    #[diagnostic(
        code(resource::unknown),
        help("Declare the resource in the Resources section of the process definition.")
    )]
    UnknownResource(Name),

    #[error("Unknown mailbox: {0}")]
    #[diagnostic(
        code(mailbox::unknown),
        help("Declare the mailbox in the Mailboxes section of the process definition.")
    )]
    UnknownMailbox(Name),
}

/// Mailbox table errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ExchangeError {
    #[error("Mailbox {0} not found")]
    #[diagnostic(code(mailbox::not_found))]
    UnknownMailbox(Name),
}

impl From<ExchangeError> for SimError {
    fn from(err: ExchangeError) -> Self {
        match err {
            ExchangeError::UnknownMailbox(name) => SimError::UnknownMailbox(name),
        }
    }
}

/// Malformed line in a process definition file
#[derive(Error, Debug, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(loader::syntax))]
pub struct SyntaxError {
    pub message: String,
    #[source_code]
    pub src: NamedSource<String>,
    #[label("here")]
    pub span: SourceSpan,
    #[help]
    pub help: Option<String>,
}

/// Errors raised while building a `LoadedModel`
#[derive(Error, Debug, Diagnostic)]
pub enum LoadError {
    #[error("Failed to read process definition {path}")]
    #[diagnostic(
        code(loader::io),
        help("Check that the file exists and is readable.")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("Process {0} is defined more than once")]
    #[diagnostic(
        code(loader::duplicate_process),
        help("Process names must be unique.")
    )]
    DuplicateProcess(Name),

    #[error("Mailbox {0} is declared more than once")]
    #[diagnostic(
        code(loader::duplicate_mailbox),
        help("Mailbox names must be unique; resources may repeat, mailboxes may not.")
    )]
    DuplicateMailbox(Name),
}

/// Command-line and environment configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ConfigError {
    #[error("Missing argument: {0}")]
    #[diagnostic(
        code(config::missing_argument),
        help("Usage: procsim <process-file> <policy: 0|fcfs|1|rr> [quantum]")
    )]
    MissingArgument(&'static str),

    #[error("Invalid scheduling policy: {0}")]
    #[diagnostic(
        code(config::invalid_policy),
        help("Use 0 or fcfs for first-come-first-served, 1 or rr for round robin.")
    )]
    InvalidPolicy(String),

    #[error("Invalid quantum: {0}")]
    #[diagnostic(
        code(config::invalid_quantum),
        help("The quantum is a non-negative instruction count; 0 selects the default of 1.")
    )]
    InvalidQuantum(String),

    #[error("Invalid output format: {0}")]
    #[diagnostic(code(config::invalid_output), help("Use text or json."))]
    InvalidOutput(String),
}

/// Unified error type for the driver
#[derive(Error, Debug, Diagnostic)]
pub enum KernelError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to render event log: {0}")]
    #[diagnostic(code(kernel::render))]
    Render(#[from] serde_json::Error),
}

pub type LoadResult<T> = Result<T, LoadError>;
pub type KernelResult<T> = Result<T, KernelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_error_display() {
        let err = SimError::ResourceNotHeld {
            process: Name::from("P1"),
            resource: Name::from("R1"),
        };
        assert_eq!(err.to_string(), "P1 does not hold R1");
    }

    #[test]
    fn test_sim_error_serialization() {
        let err = SimError::UnknownMailbox(Name::from("M9"));
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"error_type":"unknown_mailbox","details":"M9"}"#);
    }

    #[test]
    fn test_exchange_error_converts() {
        let err: SimError = ExchangeError::UnknownMailbox(Name::from("M1")).into();
        assert_eq!(err, SimError::UnknownMailbox(Name::from("M1")));
    }
}
