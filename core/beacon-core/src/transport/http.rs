//! HTTP broadcast transport.
//!
//! One `POST <endpoint>/status` per configured endpoint, each an
//! independent delivery with its own logged outcome. A non-2xx response is
//! a failure; there is no retry.

use beacon_protocol::StatusEvent;
use futures_util::FutureExt;

use crate::error::Result;

use super::Delivery;

/// Builds one delivery per endpoint. The caller hands the set to
/// [`super::settle_all`] inside a spawned task.
pub(crate) fn deliveries(
    client: &reqwest::Client,
    endpoints: &[String],
    event: &StatusEvent,
) -> Vec<Delivery> {
    endpoints
        .iter()
        .map(|endpoint| {
            let client = client.clone();
            let url = format!("{}/status", endpoint);
            let body = event.clone();
            let label = format!("http {}", endpoint);
            (
                label,
                async move { post_status(&client, &url, &body).await }.boxed(),
            )
        })
        .collect()
}

async fn post_status(client: &reqwest::Client, url: &str, event: &StatusEvent) -> Result<()> {
    client
        .post(url)
        .json(event)
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}
