//! Delayed-done scheduler.
//!
//! A tool result or message send does not reliably end a multi-step turn,
//! so the terminal `done` state is deferred: any subsequent non-terminal
//! event cancels the pending timer and suppresses the premature signal.
//! At most one timer is ever outstanding; scheduling replaces-and-cancels.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use beacon_protocol::LifecycleState;
use serde_json::Map;
use tokio::task::JoinHandle;

use crate::dispatch::StatusDispatcher;

/// Delay before the deferred `done` fires.
pub(crate) const DONE_DELAY: Duration = Duration::from_millis(3000);

#[derive(Default)]
struct TimerSlot {
    handle: Option<JoinHandle<()>>,
    /// Bumped on every schedule so a fired timer never clears a newer slot.
    generation: u64,
}

/// Single-slot deferred dispatch of the terminal `done` state.
pub struct DoneScheduler {
    dispatcher: Arc<StatusDispatcher>,
    slot: Arc<Mutex<TimerSlot>>,
}

impl DoneScheduler {
    pub fn new(dispatcher: Arc<StatusDispatcher>) -> Self {
        Self {
            dispatcher,
            slot: Arc::new(Mutex::new(TimerSlot::default())),
        }
    }

    /// Arms the done-timer, cancelling and replacing any pending one. The
    /// delay is measured from this call.
    pub fn schedule_done(&self) {
        let mut slot = lock(&self.slot);
        if let Some(pending) = slot.handle.take() {
            pending.abort();
            tracing::debug!("pending done-timer replaced");
        }

        slot.generation += 1;
        let generation = slot.generation;
        let dispatcher = Arc::clone(&self.dispatcher);
        let shared = Arc::clone(&self.slot);

        slot.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(DONE_DELAY).await;
            dispatcher.dispatch(LifecycleState::Done, Map::new());

            let mut slot = lock(&shared);
            if slot.generation == generation {
                slot.handle = None;
            }
        }));
        tracing::debug!(delay_ms = DONE_DELAY.as_millis() as u64, "done-timer armed");
    }

    /// Cancels the pending timer, if any. Safe to call when nothing is
    /// pending.
    pub fn cancel(&self) {
        let mut slot = lock(&self.slot);
        if let Some(pending) = slot.handle.take() {
            pending.abort();
            tracing::debug!("done-timer cancelled");
        }
    }

    /// Whether a done-timer is armed and has not yet fired.
    pub fn is_pending(&self) -> bool {
        lock(&self.slot)
            .handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

fn lock(slot: &Mutex<TimerSlot>) -> std::sync::MutexGuard<'_, TimerSlot> {
    match slot.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
