//! Logger bootstrap for the command wrapper.
//!
//! The library itself only emits `log` events; whoever embeds it decides
//! where they go. The CLI calls [`init_logging`] once at startup.
//!
//! # Invariants
//! - Initialization is idempotent for the same level.
//! - Re-initialization with a different level is rejected.
//! - Initialization never panics.

use flexi_logger::{Logger, LoggerHandle};
use once_cell::sync::OnceCell;

use crate::error::{CardgenError, Result};

const SUPPORTED_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    _logger: LoggerHandle,
}

/// Route `log` records at or above `level` to stderr.
///
/// # Errors
/// Returns [`CardgenError::Logging`] when `level` is unsupported, when
/// logging was already started with another level, or when the backend
/// fails to start.
pub fn init_logging(level: &str) -> Result<()> {
    let normalized = normalize_level(level)?;

    if let Some(state) = LOGGING_STATE.get() {
        if state.level != normalized {
            return Err(CardgenError::Logging(format!(
                "logging already initialized with level `{}`; refusing to switch to `{normalized}`",
                state.level
            )));
        }
        return Ok(());
    }

    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState> {
        let logger = Logger::try_with_str(normalized)
            .map_err(|err| CardgenError::Logging(err.to_string()))?
            .log_to_stderr()
            .start()
            .map_err(|err| CardgenError::Logging(err.to_string()))?;
        Ok(LoggingState {
            level: normalized,
            _logger: logger,
        })
    })?;

    log::debug!("logging initialized at level {}", state.level);
    Ok(())
}

fn normalize_level(level: &str) -> Result<&'static str> {
    let wanted = level.trim().to_ascii_lowercase();
    SUPPORTED_LEVELS
        .iter()
        .copied()
        .find(|candidate| *candidate == wanted)
        .ok_or_else(|| {
            CardgenError::Logging(format!(
                "unsupported log level `{level}`; expected one of {}",
                SUPPORTED_LEVELS.join(", ")
            ))
        })
}
