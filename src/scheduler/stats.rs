/*!
 * Scheduler Statistics
 * Counters accumulated over a run
 */

use super::Scheduler;
use crate::core::serde::is_zero_u64;
use serde::Serialize;

/// Run counters; zero fields are omitted when serialized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SchedulerStats {
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub turns: u64,
    /// Instructions consumed (a blocked request is not consumed)
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub instructions: u64,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub blocked_requests: u64,
    /// Moves from the waiting queue to the ready queue
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub promotions: u64,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub deadlocks: u64,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub victims: u64,
    /// Streams that ran out without a final release
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub exited: u64,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub messages_sent: u64,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub messages_received: u64,
    /// Sends that replaced an unread message
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub messages_overwritten: u64,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub empty_receives: u64,
    /// Unknown names and releases of unheld resources
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub config_defects: u64,
}

impl Scheduler {
    /// Snapshot of the run counters
    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_counters_are_skipped() {
        let stats = SchedulerStats {
            turns: 3,
            victims: 1,
            ..Default::default()
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert_eq!(json, r#"{"turns":3,"victims":1}"#);
    }
}
