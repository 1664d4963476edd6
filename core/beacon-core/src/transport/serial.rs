//! Serial transport: best-effort append of one JSON line per event.
//!
//! The resolved device path is cached in a slot owned by the dispatcher and
//! cleared on any write failure, so the next send re-runs discovery. A
//! missing device is not an error; the adapter stays a no-op until one
//! appears.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use beacon_protocol::StatusEvent;
use fs_err::OpenOptions;

use crate::config::MonitorConfig;
use crate::device;
use crate::error::BeaconError;

/// Sends one event over the serial device, if one can be resolved.
/// Synchronous; allowed to block briefly. Never raises.
pub(crate) fn send(config: &MonitorConfig, cache: &Mutex<Option<PathBuf>>, event: &StatusEvent) {
    if !config.serial_enabled {
        return;
    }

    let Some(port) = resolve_port(config, cache) else {
        tracing::debug!("serial send skipped (no device)");
        return;
    };

    let line = match serde_json::to_string(event) {
        Ok(line) => line,
        Err(error) => {
            tracing::warn!(%error, "failed to serialize serial payload");
            return;
        }
    };

    if let Err(source) = append_line(&port, &line) {
        let error = BeaconError::SerialWrite {
            path: port.clone(),
            source,
        };
        tracing::warn!(%error, "serial send failed");
        // Force re-discovery on the next send.
        if let Ok(mut cached) = cache.lock() {
            *cached = None;
        }
    } else {
        tracing::debug!(device = %port.display(), "serial line written");
    }
}

/// Cached path if present, else explicit config override, else discovery.
fn resolve_port(config: &MonitorConfig, cache: &Mutex<Option<PathBuf>>) -> Option<PathBuf> {
    let mut cached = cache.lock().ok()?;
    if cached.is_none() {
        *cached = config.serial_port.clone().or_else(device::find);
    }
    cached.clone()
}

fn append_line(port: &Path, line: &str) -> std::io::Result<()> {
    // No create flag: the device node must already exist.
    let mut file = OpenOptions::new().append(true).open(port)?;
    file.write_all(line.as_bytes())?;
    file.write_all(b"\n")?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_protocol::LifecycleState;
    use fs_err as fs;

    fn event() -> StatusEvent {
        StatusEvent::new(LifecycleState::Thinking, "beacon", "clawd")
    }

    fn serial_config(port: PathBuf) -> MonitorConfig {
        MonitorConfig {
            serial_enabled: true,
            serial_port: Some(port),
            ..MonitorConfig::default()
        }
    }

    #[test]
    fn appends_one_json_line_per_send() {
        let dir = tempfile::tempdir().unwrap();
        let port = dir.path().join("ttyACM0");
        fs::write(&port, "").unwrap();

        let config = serial_config(port.clone());
        let cache = Mutex::new(None);
        send(&config, &cache, &event());
        send(&config, &cache, &event());

        let contents = fs::read_to_string(&port).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: StatusEvent = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed.state, LifecycleState::Thinking);
    }

    #[test]
    fn write_failure_clears_cached_path() {
        let dir = tempfile::tempdir().unwrap();
        let port = dir.path().join("ttyACM0");
        fs::write(&port, "").unwrap();

        let config = serial_config(port.clone());
        let cache = Mutex::new(None);
        send(&config, &cache, &event());
        assert!(cache.lock().unwrap().is_some());

        fs::remove_file(&port).unwrap();
        send(&config, &cache, &event());
        assert!(cache.lock().unwrap().is_none());
    }

    #[test]
    fn disabled_transport_is_a_no_op() {
        let cache = Mutex::new(None);
        send(&MonitorConfig::default(), &cache, &event());
        assert!(cache.lock().unwrap().is_none());
    }

    #[test]
    fn missing_device_leaves_no_stale_cache_entry() {
        let config = MonitorConfig {
            serial_enabled: true,
            ..MonitorConfig::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("ttyACM9");

        let cache = Mutex::new(Some(absent));
        send(&config, &cache, &event());
        // The stale cached path failed to open and must be dropped.
        assert!(cache.lock().unwrap().is_none());
    }
}
