//! Cloud API transport.
//!
//! Bearer-authenticated `POST <base>/status` with the reduced
//! [`CloudStatus`] schema. Disabled entirely when URL, token, or a project
//! identifier is missing.

use beacon_protocol::{CloudStatus, StatusEvent};
use futures_util::FutureExt;

use crate::config::MonitorConfig;
use crate::error::Result;

use super::Delivery;

/// Builds the cloud delivery, if the transport is configured and the event
/// carries a project identifier.
pub(crate) fn delivery(
    client: &reqwest::Client,
    config: &MonitorConfig,
    event: &StatusEvent,
) -> Option<Delivery> {
    if !config.cloud_enabled() || event.project.is_empty() {
        return None;
    }
    let base = config.cloud_url.as_deref()?;

    let url = format!("{}/status", base.trim_end_matches('/'));
    let token = config.cloud_token.clone()?;
    let client = client.clone();
    let body = CloudStatus::from_event(event);

    Some((
        "cloud api".to_string(),
        async move { post_status(&client, &url, &token, &body).await }.boxed(),
    ))
}

async fn post_status(
    client: &reqwest::Client,
    url: &str,
    token: &str,
    body: &CloudStatus,
) -> Result<()> {
    client
        .post(url)
        .bearer_auth(token)
        .json(body)
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}
