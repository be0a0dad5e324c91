/*!
 * Scheduler Types
 * Policy configuration and per-turn reports
 */

use crate::core::limits::DEFAULT_QUANTUM;
use crate::core::types::{Pid, Quantum};
use crate::core::{ConfigError, Name};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Scheduling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SchedulingPolicy {
    /// First-come-first-served: each process runs its whole stream in one turn
    Fcfs,
    /// Round robin with an instruction-count quantum
    #[default]
    RoundRobin,
}

impl SchedulingPolicy {
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fcfs => "fcfs",
            Self::RoundRobin => "round_robin",
        }
    }
}

impl FromStr for SchedulingPolicy {
    type Err = ConfigError;

    /// Accepts the numeric codes of the command line (`0`, `1`) and names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "0" | "fcfs" => Ok(Self::Fcfs),
            "1" | "rr" | "round-robin" | "round_robin" | "roundrobin" => Ok(Self::RoundRobin),
            _ => Err(ConfigError::InvalidPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for SchedulingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SchedulingPolicy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SchedulingPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Policy plus quantum for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub policy: SchedulingPolicy,
    /// Instructions per round-robin turn; 0 means the default. Ignored by FCFS.
    #[serde(default)]
    pub quantum: Quantum,
}

impl SchedulerConfig {
    pub fn new(policy: SchedulingPolicy, quantum: Quantum) -> Self {
        Self { policy, quantum }
    }

    pub fn fcfs() -> Self {
        Self::new(SchedulingPolicy::Fcfs, 0)
    }

    pub fn round_robin(quantum: Quantum) -> Self {
        Self::new(SchedulingPolicy::RoundRobin, quantum)
    }

    /// Quantum actually used by a round-robin turn
    #[inline]
    pub fn effective_quantum(&self) -> Quantum {
        if self.quantum == 0 {
            DEFAULT_QUANTUM
        } else {
            self.quantum
        }
    }

    /// Instruction budget of one turn; `None` runs the stream to its end
    pub(super) fn turn_budget(&self) -> Option<Quantum> {
        match self.policy {
            SchedulingPolicy::Fcfs => None,
            SchedulingPolicy::RoundRobin => Some(self.effective_quantum()),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::round_robin(DEFAULT_QUANTUM)
    }
}

/// How a turn ended for the dispatched process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnEnd {
    /// Quantum used up with instructions left; back on the ready queue
    Requeued,
    /// A request could not be satisfied; filed to the waiting queue
    Blocked,
    /// Stream ended on a release, or terminated as a deadlock victim during the turn
    Terminated,
    /// Stream ended on something other than a release; the process left the
    /// queues without terminating
    Exited,
    /// Blocked under FCFS, which halts the run
    Stalled,
}

/// Report for one scheduling turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Turn {
    pub pid: Pid,
    /// Instructions consumed during the turn
    pub executed: u32,
    pub end: TurnEnd,
}

/// Result of `Scheduler::run`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    /// The ready queue drained
    Completed,
    /// An FCFS process blocked and could never be resumed
    Stalled { process: Name, resource: Name },
}

impl RunOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunOutcome::Completed => "completed",
            RunOutcome::Stalled { .. } => "stalled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parsing() {
        assert_eq!("0".parse::<SchedulingPolicy>(), Ok(SchedulingPolicy::Fcfs));
        assert_eq!("FCFS".parse::<SchedulingPolicy>(), Ok(SchedulingPolicy::Fcfs));
        assert_eq!("1".parse::<SchedulingPolicy>(), Ok(SchedulingPolicy::RoundRobin));
        assert_eq!(
            "round-robin".parse::<SchedulingPolicy>(),
            Ok(SchedulingPolicy::RoundRobin)
        );
        assert_eq!(
            "2".parse::<SchedulingPolicy>(),
            Err(ConfigError::InvalidPolicy("2".to_string()))
        );
    }

    #[test]
    fn test_policy_serde() {
        let json = serde_json::to_string(&SchedulingPolicy::RoundRobin).unwrap();
        assert_eq!(json, "\"round_robin\"");
        let policy: SchedulingPolicy = serde_json::from_str("\"fcfs\"").unwrap();
        assert_eq!(policy, SchedulingPolicy::Fcfs);
    }

    #[test]
    fn test_zero_quantum_defaults_to_one() {
        assert_eq!(SchedulerConfig::round_robin(0).effective_quantum(), 1);
        assert_eq!(SchedulerConfig::round_robin(3).effective_quantum(), 3);
        assert_eq!(SchedulerConfig::round_robin(0).turn_budget(), Some(1));
        assert_eq!(SchedulerConfig::fcfs().turn_budget(), None);
    }

    #[test]
    fn test_config_deserializes_without_quantum() {
        let config: SchedulerConfig = serde_json::from_str(r#"{"policy":"rr"}"#).unwrap();
        assert_eq!(config, SchedulerConfig::round_robin(0));
        assert_eq!(config.effective_quantum(), 1);
    }
}
