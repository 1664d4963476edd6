//! Error types for beacon-core operations.
//!
//! These never cross the hook boundary: adapter entry points catch and log
//! every failure. The enum exists so internal helpers can use `?` and still
//! produce useful context in the logs.

use std::path::PathBuf;

/// All errors that can occur inside the dispatcher and its transports.
#[derive(Debug, thiserror::Error)]
pub enum BeaconError {
    #[error("no writable serial device found")]
    DeviceNotFound,

    #[error("serial write failed: {path}: {source}")]
    SerialWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to launch desktop app: {0}")]
    DesktopLaunch(#[source] std::io::Error),
}

/// Convenience alias for Results using BeaconError.
pub type Result<T> = std::result::Result<T, BeaconError>;
