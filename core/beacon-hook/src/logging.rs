//! Tracing initialization for the hook binary.
//!
//! Logs go to a daily-rolled file under `~/.beacon/logs/`; stdout stays
//! clean for the host. `RUST_LOG` overrides the default filter; the debug
//! config flag lowers it without touching the environment.

use fs_err as fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_DIR: &str = ".beacon/logs";
const LOG_FILE_PREFIX: &str = "beacon-hook.log";

/// Keep the returned guard alive for the process lifetime; dropping it
/// flushes and stops the writer thread.
pub fn init(debug: bool) -> Option<WorkerGuard> {
    let home = dirs::home_dir()?;
    let log_dir = home.join(LOG_DIR);
    if fs::create_dir_all(&log_dir).is_err() {
        return None;
    }

    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let default_directive = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Some(guard)
}
