// ==========================================
// Logging Setup
// ==========================================
// tracing + tracing-subscriber, level from RUST_LOG.
// Logs go to stderr; stdout carries report output only.
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Selects JSON log lines instead of the human format
pub const LOG_FORMAT_ENV_VAR: &str = "MINING_REPORTS_LOG_FORMAT";

/// Initializes the global subscriber
///
/// # Environment
/// - RUST_LOG: filter (default: info), e.g. `RUST_LOG=mining_reports=debug`
/// - MINING_REPORTS_LOG_FORMAT: `json` for one JSON object per event
///
/// # Example
/// ```no_run
/// use mining_reports::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var(LOG_FORMAT_ENV_VAR)
        .map(|v| v.trim().eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(err) = result {
        eprintln!("logging already initialized: {}", err);
    }
}

/// Debug-level subscriber for tests; safe to call repeatedly
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
