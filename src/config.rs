/*!
 * Run Configuration
 * Command line and environment settings for the `procsim` binary
 *
 * Usage: `procsim <process-file> <policy> [quantum]`
 *
 * Environment variables:
 * - PROCSIM_QUANTUM: quantum when none is given on the command line
 * - PROCSIM_OUTPUT: `text` (default) or `json` event log rendering
 * - PROCSIM_TRACE_JSON: `1` or `true` for JSON tracing output
 * - RUST_LOG: tracing filter (default: warn)
 */

use crate::core::errors::ConfigError;
use crate::core::limits::{ENV_OUTPUT, ENV_QUANTUM, ENV_TRACE_JSON};
use crate::core::types::Quantum;
use crate::scheduler::{SchedulerConfig, SchedulingPolicy};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Event log rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidOutput(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        })
    }
}

/// Everything the binary needs to perform one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunConfig {
    pub path: PathBuf,
    pub scheduler: SchedulerConfig,
    pub output: OutputFormat,
    pub trace_json: bool,
}

impl RunConfig {
    /// Build from process arguments (program name already skipped) and the
    /// process environment
    pub fn from_env_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        Self::from_args(args, |key| std::env::var(key).ok())
    }

    /// Build from arguments and an environment lookup
    pub fn from_args<I, E>(args: I, env: E) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
        E: Fn(&str) -> Option<String>,
    {
        let mut args = args.into_iter();
        let path = args
            .next()
            .map(PathBuf::from)
            .ok_or(ConfigError::MissingArgument("process-file"))?;
        let policy: SchedulingPolicy = args
            .next()
            .ok_or(ConfigError::MissingArgument("policy"))?
            .parse()?;

        let quantum = match args.next().or_else(|| env(ENV_QUANTUM)) {
            Some(raw) => parse_quantum(&raw)?,
            None => 0,
        };

        let output = match env(ENV_OUTPUT) {
            Some(raw) => raw.parse()?,
            None => OutputFormat::default(),
        };

        let trace_json = env(ENV_TRACE_JSON)
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            path,
            scheduler: SchedulerConfig::new(policy, quantum),
            output,
            trace_json,
        })
    }
}

fn parse_quantum(raw: &str) -> Result<Quantum, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidQuantum(raw.to_string()))
}
