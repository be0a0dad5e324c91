/*!
 * System Limits and Constants
 *
 * Centralized location for simulator-wide defaults and environment keys.
 */

use super::types::Quantum;

// =============================================================================
// SCHEDULING
// =============================================================================

/// Instructions per round-robin turn when the caller passes 0
pub const DEFAULT_QUANTUM: Quantum = 1;

// =============================================================================
// CONFIGURATION KEYS
// =============================================================================

/// Quantum override used when no positional quantum is given
pub const ENV_QUANTUM: &str = "PROCSIM_QUANTUM";

/// Event log rendering: `text` or `json`
pub const ENV_OUTPUT: &str = "PROCSIM_OUTPUT";

/// Enables JSON tracing output when set to `1` or `true`
pub const ENV_TRACE_JSON: &str = "PROCSIM_TRACE_JSON";

/// Tracing filter used by the CLI when `RUST_LOG` is unset.
/// Kept quiet so the event log is the primary output.
pub const DEFAULT_CLI_LOG_FILTER: &str = "warn";
