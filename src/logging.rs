//! # Structured Logging Module
//!
//! Console logging through `tracing-subscriber`, plus helpers that give
//! workflow transitions a consistent set of structured fields.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;
use crate::models::{Actor, TestRequestId};
use crate::state_machine::states::RequestStatus;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging. Safe to call more than once; only the first
/// call installs a subscriber.
pub fn init_structured_logging(config: &LoggingConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = build_filter(&config.level);

        let layer = if config.json {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(false)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(true)
                .with_filter(filter)
                .boxed()
        };

        // An embedding application may already own the global subscriber
        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!(
                "Global tracing subscriber already initialized, keeping existing subscriber"
            );
        }

        tracing::info!(
            level = %config.level,
            json = config.json,
            "Structured logging initialized"
        );
    });
}

/// `RUST_LOG` wins over the configured level
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Log a committed transition
pub fn log_transition(
    operation: &str,
    request_id: TestRequestId,
    from: RequestStatus,
    to: RequestStatus,
    actor: &Actor,
    version: i64,
) {
    tracing::info!(
        operation = %operation,
        request_id = %request_id,
        from = %from,
        to = %to,
        actor_id = %actor.id,
        role = %actor.role,
        version = version,
        "TRANSITION_COMMITTED"
    );
}

/// Log a transition attempt that was refused
pub fn log_rejection(operation: &str, request_id: TestRequestId, actor: &Actor, error: &str) {
    tracing::warn!(
        operation = %operation,
        request_id = %request_id,
        actor_id = %actor.id,
        role = %actor.role,
        error = %error,
        "TRANSITION_REJECTED"
    );
}
