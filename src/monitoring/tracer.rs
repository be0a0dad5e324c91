/*!
 * Tracing
 * Structured diagnostics for simulation runs using the tracing crate
 */

use std::time::Instant;
use tracing::{debug, info, span, warn, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};
use uuid::Uuid;

/// Slow-run threshold for the completion log line
const SLOW_RUN_MS: u128 = 500;

/// Initialize structured tracing
///
/// `RUST_LOG` overrides `default_filter`. With `json` set, events are written
/// as JSON lines with span context; otherwise a compact human-readable format
/// is used. Calling this twice is harmless.
pub fn init_tracing(json: bool, default_filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
    };

    if result.is_ok() {
        debug!(json, "Structured tracing initialized");
    }
}

/// Generate a unique run ID for log correlation
pub fn generate_run_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span covering one scheduler run
pub struct RunSpan {
    span: tracing::Span,
    start: Instant,
    run_id: String,
}

impl RunSpan {
    pub fn new(policy: &str, quantum: u32, processes: usize) -> Self {
        let run_id = generate_run_id();

        let span = span!(
            Level::INFO,
            "run",
            run_id = %run_id,
            policy = policy,
            quantum = quantum,
            processes = processes,
            turns = tracing::field::Empty,
            outcome = tracing::field::Empty,
        );

        let entered = span.enter();
        info!(policy, quantum, processes, "run started");
        drop(entered);

        Self {
            span,
            start: Instant::now(),
            run_id,
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn record_turns(&self, turns: u64) {
        self.span.record("turns", turns);
    }

    pub fn record_outcome(&self, outcome: &str) {
        self.span.record("outcome", outcome);
    }

    /// Enter the span context for the duration of the guard
    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for RunSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        let _entered = self.span.enter();

        if duration.as_millis() > SLOW_RUN_MS {
            warn!(
                run_id = %self.run_id,
                duration_ms = duration.as_millis() as u64,
                slow = true,
                "slow run"
            );
        } else {
            debug!(
                run_id = %self.run_id,
                duration_us = duration.as_micros() as u64,
                "run completed"
            );
        }
    }
}
