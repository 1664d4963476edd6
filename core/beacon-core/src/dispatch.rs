//! The status dispatcher.
//!
//! Builds canonical payloads, applies the debounce rule, and fans out to
//! every enabled transport. The synchronous portion (debounce check, state
//! bookkeeping, serial write) runs inline on the host's hook path; network
//! transports are spawned tasks whose outcomes are only logged.
//!
//! Host delivery is single-threaded, so no two dispatch calls race their
//! synchronous portions; the `Mutex` exists for the spawned done-timer,
//! which calls back into `dispatch` from its own task.

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use beacon_protocol::{LifecycleState, StatusEvent};
use once_cell::sync::OnceCell;
use serde_json::{Map, Value};
use tokio::time::Instant;

use crate::config::MonitorConfig;
use crate::model;
use crate::terminal;
use crate::transport;

/// Repeats of the same state inside this window are suppressed.
pub(crate) const DEBOUNCE_WINDOW: Duration = Duration::from_millis(100);

/// Mutable dispatcher bookkeeping. Single instance, owned by the
/// dispatcher, mutated only on a non-debounced send.
#[derive(Debug, Default)]
pub(crate) struct DispatcherState {
    pub(crate) current_state: Option<LifecycleState>,
    pub(crate) last_send: Option<Instant>,
    /// Count of non-debounced sends, for log correlation.
    pub(crate) send_seq: u64,
}

/// Process-lifetime status dispatcher. Construct one at host startup and
/// keep it; there is no teardown beyond process exit.
pub struct StatusDispatcher {
    config: MonitorConfig,
    pub(crate) http: reqwest::Client,
    state: Mutex<DispatcherState>,
    /// Serial device cache, cleared by the serial adapter on write failure.
    device: Mutex<Option<PathBuf>>,
    /// Model name, resolved at most once per process.
    model: OnceCell<String>,
}

impl StatusDispatcher {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            state: Mutex::new(DispatcherState::default()),
            device: Mutex::new(None),
            model: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Last successfully sent state, if any.
    pub fn current_state(&self) -> Option<LifecycleState> {
        self.state.lock().ok().and_then(|state| state.current_state)
    }

    pub(crate) fn send_seq(&self) -> u64 {
        self.state.lock().map(|state| state.send_seq).unwrap_or(0)
    }

    /// Dispatches a state to every enabled transport. A `"tool"` entry in
    /// `extra` populates the typed payload field; remaining entries are
    /// flattened into the generic payload.
    ///
    /// Returns before network transports complete; their outcomes are
    /// logged from a spawned task. Must be called within a tokio runtime.
    pub fn dispatch(&self, state: LifecycleState, extra: Map<String, Value>) {
        let now = Instant::now();
        let seq = {
            let mut book = match self.state.lock() {
                Ok(book) => book,
                Err(poisoned) => poisoned.into_inner(),
            };

            let repeat_within_window = book.current_state == Some(state)
                && book
                    .last_send
                    .is_some_and(|last| now.duration_since(last) < DEBOUNCE_WINDOW);
            if repeat_within_window {
                tracing::debug!(%state, "dispatch debounced");
                return;
            }

            book.current_state = Some(state);
            book.last_send = Some(now);
            book.send_seq += 1;
            book.send_seq
        };

        let event = self.build_event(state, extra);
        tracing::debug!(seq, %state, project = %event.project, "dispatching status");

        // Serial first: synchronous, fire and forget.
        transport::serial::send(&self.config, &self.device, &event);

        let mut deliveries =
            transport::http::deliveries(&self.http, &self.config.http_endpoints, &event);
        if let Some(cloud) = transport::cloud::delivery(&self.http, &self.config, &event) {
            deliveries.push(cloud);
        }

        if !deliveries.is_empty() {
            tokio::spawn(transport::settle_all(deliveries));
        }
    }

    /// Builds a fresh payload from the configured identity, the memoized
    /// model, and the caller's extra fields.
    pub(crate) fn build_event(
        &self,
        state: LifecycleState,
        mut extra: Map<String, Value>,
    ) -> StatusEvent {
        let mut event = StatusEvent::new(
            state,
            self.config.project.clone(),
            self.config.character.clone(),
        );

        if let Some(Value::String(tool)) = extra.remove("tool") {
            if !tool.is_empty() {
                event.tool = Some(tool);
            }
        }

        event.model = self.resolved_model();
        event.terminal_id = terminal::terminal_id();
        event.extra = extra;
        event
    }

    /// Memoized model lookup. A failed resolution is retried on the next
    /// dispatch; a successful one sticks for the process lifetime.
    fn resolved_model(&self) -> Option<String> {
        if let Some(model) = self.model.get() {
            return Some(model.clone());
        }
        let resolved = model::resolve(&self.config)?;
        let _ = self.model.set(resolved.clone());
        Some(resolved)
    }
}
