//! Logging infrastructure for the costbot client.
//!
//! Logs go to stderr; stdout carries answers and citations only.

use std::io::IsTerminal;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{AppError, AppResult};

/// Initialize the tracing subscriber with stderr output.
///
/// Filtering comes from `log_level` when given, else `RUST_LOG`, else
/// `info`. The AWS SDK crates are capped at `warn` unless the filter names
/// them explicitly.
///
/// # Arguments
/// * `log_level` - Optional log level override (e.g., "debug", "info")
/// * `no_color` - Disable colored output
///
/// # Example
/// ```no_run
/// use costbot_core::logging::init_logging;
///
/// init_logging(None, false).expect("Failed to initialize logging");
/// ```
pub fn init_logging(log_level: Option<&str>, no_color: bool) -> AppResult<()> {
    // Determine the filter level
    let default_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_str = log_level.unwrap_or(&default_level);

    let env_filter = EnvFilter::try_new(with_sdk_defaults(filter_str))
        .map_err(|e| AppError::Config(format!("Invalid log filter: {}", e)))?;

    // Configure format layer with color control
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(!no_color && supports_color());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| AppError::Config(format!("Failed to init logging: {}", e)))?;

    Ok(())
}

/// Append quiet defaults for the chatty SDK targets.
fn with_sdk_defaults(filter: &str) -> String {
    let mut directives = filter.to_string();
    for target in ["aws_config", "aws_smithy_runtime", "hyper"] {
        if !filter.contains(target) {
            directives.push_str(&format!(",{}=warn", target));
        }
    }
    directives
}

/// Check if stderr is a terminal that should receive colour codes.
fn supports_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    std::io::stderr().is_terminal()
}
