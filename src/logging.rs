//! Execution tracing to the file named by `REDSHELL_LOG`.
//!
//! The terminal belongs to the prompt and to command output, so traces
//! never go there. When the variable is unset the `log` macros stay
//! wired to the default no-op logger.

use simplelog::{Config, LevelFilter, WriteLogger};
use std::sync::Once;

/// Ensures the logger is initialized exactly once per process.
static INIT: Once = Once::new();

/// Install the file logger. Best-effort: an unset variable or an
/// unwritable path leaves tracing disabled.
pub fn init() {
    INIT.call_once(|| {
        let Some(path) = std::env::var_os("REDSHELL_LOG") else {
            return;
        };
        let Ok(file) = std::fs::OpenOptions::new().create(true).append(true).open(path) else {
            return;
        };
        let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), file);
    });
}
