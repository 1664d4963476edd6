//! Host-facing hook adapter.
//!
//! Thin mapping of the host's named lifecycle callbacks onto dispatcher and
//! scheduler calls. The policy worth reading lives elsewhere: debounce in
//! [`crate::dispatch`], done-deferral in [`crate::schedule`].
//!
//! ```text
//! gateway_start        -> auto-launch attempt, dispatch start
//! before_agent_start   -> cancel done-timer, dispatch thinking
//! before_tool_call(t)  -> cancel done-timer, dispatch working + tool
//! after_tool_call(t)   -> dispatch thinking unless a done-timer is pending
//! message_sent(ok)     -> schedule done on success
//! agent_end(ok)        -> schedule done on success unless one is pending
//! session_end          -> cancel done-timer, dispatch done
//! gateway_stop         -> cancel done-timer, dispatch done
//! ```

use std::sync::Arc;

use beacon_protocol::LifecycleState;
use serde_json::{json, Map, Value};

use crate::config::MonitorConfig;
use crate::desktop;
use crate::dispatch::StatusDispatcher;
use crate::schedule::DoneScheduler;

/// One instance per host process; hook callbacks arrive one at a time.
pub struct HookAdapter {
    dispatcher: Arc<StatusDispatcher>,
    scheduler: DoneScheduler,
}

impl HookAdapter {
    pub fn new(config: MonitorConfig) -> Self {
        let dispatcher = Arc::new(StatusDispatcher::new(config));
        let scheduler = DoneScheduler::new(Arc::clone(&dispatcher));
        Self {
            dispatcher,
            scheduler,
        }
    }

    pub fn dispatcher(&self) -> &Arc<StatusDispatcher> {
        &self.dispatcher
    }

    pub async fn gateway_start(&self) {
        desktop::ensure_running(&self.dispatcher.http, self.dispatcher.config()).await;
        self.dispatcher.dispatch(LifecycleState::Start, Map::new());
    }

    pub fn before_agent_start(&self) {
        self.scheduler.cancel();
        self.dispatcher
            .dispatch(LifecycleState::Thinking, Map::new());
    }

    pub fn before_tool_call(&self, tool: &str) {
        self.scheduler.cancel();
        let mut extra = Map::new();
        extra.insert("tool".to_string(), json!(tool));
        self.dispatcher.dispatch(LifecycleState::Working, extra);
    }

    pub fn after_tool_call(&self, _tool: &str) {
        if self.scheduler.is_pending() {
            return;
        }
        self.dispatcher
            .dispatch(LifecycleState::Thinking, Map::new());
    }

    pub fn message_sent(&self, success: bool) {
        if success {
            self.scheduler.schedule_done();
        }
    }

    pub fn agent_end(&self, success: bool) {
        if success && !self.scheduler.is_pending() {
            self.scheduler.schedule_done();
        }
    }

    pub fn session_end(&self) {
        self.scheduler.cancel();
        self.dispatcher.dispatch(LifecycleState::Done, Map::new());
    }

    pub fn gateway_stop(&self) {
        self.scheduler.cancel();
        self.dispatcher.dispatch(LifecycleState::Done, Map::new());
    }

    /// Escape hatch for host surfaces that need to push a state directly
    /// (e.g. `packing` before a context compaction).
    pub fn dispatch(&self, state: LifecycleState, extra: Map<String, Value>) {
        self.dispatcher.dispatch(state, extra);
    }
}
