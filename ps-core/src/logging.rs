//! Tracing subscriber for the phone simulator binaries.
//!
//! Console output goes to stderr so `--format json` stdout stays parseable.
//! A daily-rotated file under the configured log directory receives the same
//! events, optionally as JSON lines.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{PsError, PsResult};

const LOG_FILE_PREFIX: &str = "phone-simulator.log";

/// Crates whose events the plain level applies to. Everything else stays at `warn`.
const OWN_CRATES: [&str; 4] = ["ps_core", "ps_models", "ps_services", "ps_cli"];

/// Keeps the background log writer alive; dropping it flushes the file.
pub struct LogGuard {
    _worker: WorkerGuard,
}

/// Turn a configured level into a filter directive.
///
/// A bare level such as `debug` is scoped to the simulator crates. Anything
/// already containing `=` or `,` is taken as a full directive.
pub fn filter_directive(level: &str) -> String {
    let level = level.trim();
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }
    let level = if level.is_empty() { "info" } else { level };
    let mut directive = String::from("warn");
    for krate in OWN_CRATES {
        directive.push_str(&format!(",{krate}={level}"));
    }
    directive
}

/// Install the global subscriber: compact console on stderr plus a rolling file.
///
/// `RUST_LOG` wins over `level` when set. An unparseable level falls back to
/// `info` for the simulator crates.
pub fn init_logging(level: &str, log_dir: &Path, json_output: bool) -> PsResult<LogGuard> {
    std::fs::create_dir_all(log_dir)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter_directive(level)))
        .unwrap_or_else(|_| EnvFilter::new(filter_directive("info")));

    let (writer, worker) = tracing_appender::non_blocking(rolling::daily(log_dir, LOG_FILE_PREFIX));

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let (json_file, text_file) = if json_output {
        (Some(fmt::layer().with_writer(writer).json().with_current_span(false)), None)
    } else {
        (None, Some(fmt::layer().with_writer(writer).with_ansi(false).with_line_number(true)))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(json_file)
        .with(text_file)
        .try_init()
        .map_err(|e| PsError::Config(format!("log subscriber already installed: {e}")))?;

    tracing::debug!(dir = %log_dir.display(), json_output, "logging ready");
    Ok(LogGuard { _worker: worker })
}
