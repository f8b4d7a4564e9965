//! Structured logging for the blackjack client.
//!
//! Log output goes to stderr so the table on stdout stays readable. Records
//! emitted through the `log` facade by `private_blackjack` are picked up by
//! the same subscriber.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging. Levels come from `RUST_LOG`, defaulting to `warn`.
///
/// # Example
///
/// ```no_run
/// use bj_client::logging;
///
/// logging::init();
/// tracing::info!("Client starting");
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,hyper=warn,reqwest=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::debug!("Logging initialized");
}

/// Log one call to the blackjack server.
///
/// # Arguments
///
/// * `operation` - Operation name (e.g. "place bet")
/// * `duration_ms` - Round trip in milliseconds
/// * `result` - `Ok` or a short error description
///
/// # Example
///
/// ```
/// use bj_client::logging::log_remote_call;
///
/// log_remote_call("hit", 42, Ok(()));
/// log_remote_call("stand", 1500, Err("timed out"));
/// ```
pub fn log_remote_call(operation: &str, duration_ms: u64, result: Result<(), &str>) {
    match result {
        Ok(()) => tracing::debug!(
            operation = operation,
            duration_ms = duration_ms,
            "Remote call succeeded"
        ),
        Err(error) => tracing::warn!(
            operation = operation,
            duration_ms = duration_ms,
            error = error,
            "Remote call failed"
        ),
    }

    if duration_ms > 1000 {
        tracing::warn!(
            operation = operation,
            duration_ms = duration_ms,
            "PERFORMANCE: Slow remote call"
        );
    }
}
