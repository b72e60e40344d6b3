//! File logging for the binary. The terminal belongs to the TUI, so events
//! go to `grove.log` in the state directory.

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Environment variable holding the filter directives
pub const LOG_ENV: &str = "GROVE_LOG";
pub const LOG_FILE: &str = "grove.log";
const DEFAULT_FILTER: &str = "warn";

/// Keeps the background writer alive; drop it to flush.
pub struct LogGuard(#[allow(dead_code)] WorkerGuard);

/// Filter from `GROVE_LOG`, falling back to `warn` when unset or invalid.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber writing to `<dir>/grove.log`.
///
/// Returns `None` when the log file cannot be opened or a subscriber is
/// already installed; the program runs without logging in that case.
pub fn init(dir: &Path) -> Option<LogGuard> {
    if let Err(e) = fs::create_dir_all(dir) {
        eprintln!("warning: could not create log directory {}: {}", dir.display(), e);
        return None;
    }
    let file = match fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))
    {
        Ok(f) => f,
        Err(e) => {
            eprintln!("warning: could not open {}: {}", dir.join(LOG_FILE).display(), e);
            return None;
        }
    };
    let (writer, guard) = tracing_appender::non_blocking(file);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(file_layer)
        .try_init()
        .ok()?;

    Some(LogGuard(guard))
}
