//! Transport adapters and the settle-all fan-out combinator.
//!
//! Three independent delivery mechanisms exist: a line-delimited append to
//! a local serial device, a concurrent POST to every configured broadcast
//! endpoint, and an authenticated POST to the cloud API. Each is a total
//! function with respect to failure: outcomes are logged, never raised.

pub(crate) mod cloud;
pub(crate) mod http;
pub(crate) mod serial;

use futures_util::future::{join_all, BoxFuture};

use crate::error::Result;

/// A labeled delivery attempt; the label names the target in logs.
pub(crate) type Delivery = (String, BoxFuture<'static, Result<()>>);

/// Awaits every delivery to settle (success or failure) and logs each
/// outcome independently. No failure short-circuits or propagates.
pub(crate) async fn settle_all(deliveries: Vec<Delivery>) {
    let settled = join_all(deliveries.into_iter().map(|(target, fut)| async move {
        (target, fut.await)
    }))
    .await;

    for (target, outcome) in settled {
        match outcome {
            Ok(()) => tracing::debug!(%target, "status delivered"),
            Err(error) => tracing::warn!(%target, %error, "status delivery failed"),
        }
    }
}
