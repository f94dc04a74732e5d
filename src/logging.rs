//! Logging bootstrap for the `day` binary.
//!
//! The library only emits through the `log` facade; this module wires that
//! facade to stderr. `RUST_LOG` wins over the level passed in.

use flexi_logger::{FlexiLoggerError, Logger, LoggerHandle};

const SUPPORTED_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Start logging to stderr at `level` unless `RUST_LOG` says otherwise.
///
/// Keep the returned handle alive for the life of the process.
pub fn init_logging(level: &str) -> Result<LoggerHandle, FlexiLoggerError> {
    Logger::try_with_env_or_str(normalize_level(level))?
        .log_to_stderr()
        .format(flexi_logger::default_format)
        .start()
}

/// Lowercased `level` if it is a known level name, else `warn`.
pub fn normalize_level(level: &str) -> &'static str {
    let wanted = level.trim().to_ascii_lowercase();
    SUPPORTED_LEVELS
        .iter()
        .find(|l| **l == wanted)
        .copied()
        .unwrap_or("warn")
}
