//! Desktop app liveness and auto-launch.
//!
//! When a loopback endpoint is configured, a session start first checks
//! `GET <local>/health`; if the desktop app is not responding it is spawned
//! detached through the user's login shell and given a fixed settle delay
//! to begin listening. The window is then raised with `POST <local>/show`.
//! Nothing here is tracked or reaped, and nothing raises.

use std::env;
use std::process::{Command, Stdio};
use std::time::Duration;

use crate::config::MonitorConfig;
use crate::error::{BeaconError, Result};

/// Time granted to a freshly spawned desktop app before sends resume.
pub(crate) const SETTLE_DELAY: Duration = Duration::from_millis(3000);

const DEFAULT_COMMAND: &str = "npx beacon-desktop@latest";

/// Health-checks the desktop endpoint and launches the app if absent.
/// No-op unless auto-launch is enabled and a loopback endpoint exists.
pub async fn ensure_running(client: &reqwest::Client, config: &MonitorConfig) {
    if !config.auto_launch {
        return;
    }
    let Some(url) = config.desktop_url() else {
        return;
    };

    if !is_running(client, url).await {
        tracing::info!("desktop app not running, launching");
        match launch(config) {
            Ok(()) => tokio::time::sleep(SETTLE_DELAY).await,
            Err(error) => tracing::warn!(%error, "desktop launch failed"),
        }
    }

    show_window(client, url).await;
}

/// Any error or non-2xx means "not running".
async fn is_running(client: &reqwest::Client, url: &str) -> bool {
    match client.get(format!("{}/health", url)).send().await {
        Ok(response) => response.status().is_success(),
        Err(_) => false,
    }
}

async fn show_window(client: &reqwest::Client, url: &str) {
    if let Err(error) = client.post(format!("{}/show", url)).send().await {
        tracing::debug!(%error, "desktop show failed");
    }
}

/// Spawns the desktop app through the user's login shell, detached. The
/// child is never waited on; it outlives the host session.
fn launch(config: &MonitorConfig) -> Result<()> {
    let shell = env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string());
    let command = config.desktop_command.as_deref().unwrap_or(DEFAULT_COMMAND);
    tracing::debug!(%shell, %command, "spawning desktop app");

    let mut child = Command::new(shell);
    child
        .args(["-l", "-c", command])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        // Own process group so host signals don't take the app down.
        child.process_group(0);
    }

    child.spawn().map_err(BeaconError::DesktopLaunch)?;
    Ok(())
}
