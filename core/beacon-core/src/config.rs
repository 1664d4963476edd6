//! Static dispatcher configuration.
//!
//! The core consumes a plain [`MonitorConfig`] struct; producing one (from
//! environment variables, a settings file, whatever the host prefers) is the
//! caller's job. Resolved once at startup, immutable thereafter.
//!
//! Absence of a transport's settings silently disables that transport; it is
//! never an error.

use std::path::PathBuf;

/// Default project identifier when the host supplies none.
pub const DEFAULT_PROJECT: &str = "default";

/// Default display skin identifier.
pub const DEFAULT_CHARACTER: &str = "clawd";

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Project identifier stamped on every payload.
    pub project: String,
    /// Display skin identifier stamped on every payload.
    pub character: String,

    /// Whether the serial transport is enabled at all.
    pub serial_enabled: bool,
    /// Explicit serial device path; when absent, the device locator probes
    /// the platform device directory.
    pub serial_port: Option<PathBuf>,

    /// Broadcast targets; the HTTP transport is enabled iff non-empty.
    pub http_endpoints: Vec<String>,

    /// Cloud API base URL. Both URL and token must be present to enable the
    /// cloud transport.
    pub cloud_url: Option<String>,
    pub cloud_token: Option<String>,

    /// Launch the desktop app when a loopback endpoint is configured but
    /// not responding.
    pub auto_launch: bool,
    /// Override for the desktop launch command line.
    pub desktop_command: Option<String>,

    /// Override for the statusline cache file the model name is read from.
    pub model_cache_path: Option<PathBuf>,

    /// Verbose logging.
    pub debug: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            project: DEFAULT_PROJECT.to_string(),
            character: DEFAULT_CHARACTER.to_string(),
            serial_enabled: false,
            serial_port: None,
            http_endpoints: Vec::new(),
            cloud_url: None,
            cloud_token: None,
            auto_launch: false,
            desktop_command: None,
            model_cache_path: None,
            debug: false,
        }
    }
}

impl MonitorConfig {
    /// Whether the HTTP broadcast transport has anything to do.
    pub fn http_enabled(&self) -> bool {
        !self.http_endpoints.is_empty()
    }

    /// Whether the cloud transport is fully configured.
    pub fn cloud_enabled(&self) -> bool {
        matches!((&self.cloud_url, &self.cloud_token), (Some(url), Some(token))
            if !url.is_empty() && !token.is_empty())
    }

    /// First loopback endpoint, i.e. the desktop app, if one is configured.
    pub fn desktop_url(&self) -> Option<&str> {
        self.http_endpoints
            .iter()
            .map(String::as_str)
            .find(|url| is_loopback_url(url))
    }
}

/// Whether a URL targets the local machine (the desktop app).
pub fn is_loopback_url(url: &str) -> bool {
    url.contains("127.0.0.1") || url.contains("localhost")
}
