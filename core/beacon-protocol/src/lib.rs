//! Wire payload types for beacon status transports.
//!
//! This crate is shared by the dispatcher and external surface tooling (the
//! desktop app and firmware test harnesses speak the same JSON) to prevent
//! schema drift. Two shapes exist on the wire:
//!
//! - [`StatusEvent`]: the generic payload, sent as one JSON line over serial
//!   and as the body of `POST <endpoint>/status` to broadcast targets.
//! - [`CloudStatus`]: the reduced payload accepted by the authenticated
//!   cloud API. Built from a [`StatusEvent`]; never carries extra fields.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lifecycle state of an assistant session, as surfaced to displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    Start,
    Thinking,
    Working,
    Packing,
    Notification,
    Done,
    /// Host is in a plan/read-only permission mode.
    Planning,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Start => "start",
            LifecycleState::Thinking => "thinking",
            LifecycleState::Working => "working",
            LifecycleState::Packing => "packing",
            LifecycleState::Notification => "notification",
            LifecycleState::Done => "done",
            LifecycleState::Planning => "planning",
        }
    }

    /// Whether this state ends a turn (no further activity expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecycleState::Done)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifecycleState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(LifecycleState::Start),
            "thinking" => Ok(LifecycleState::Thinking),
            "working" => Ok(LifecycleState::Working),
            "packing" => Ok(LifecycleState::Packing),
            "notification" => Ok(LifecycleState::Notification),
            "done" => Ok(LifecycleState::Done),
            "planning" => Ok(LifecycleState::Planning),
            other => Err(format!("unknown lifecycle state: {}", other)),
        }
    }
}

/// The canonical status payload. Immutable once built; the dispatcher
/// constructs a fresh one per send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub state: LifecycleState,
    pub project: String,
    pub character: String,
    /// Name of the tool being invoked; present only for `working`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    /// Short model name, resolved lazily by the dispatcher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Identifier of the hosting terminal, when detectable.
    #[serde(
        default,
        rename = "terminalId",
        skip_serializing_if = "Option::is_none"
    )]
    pub terminal_id: Option<String>,
    /// Caller-supplied fields (e.g. a free-text note), flattened into the
    /// JSON object.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StatusEvent {
    pub fn new(
        state: LifecycleState,
        project: impl Into<String>,
        character: impl Into<String>,
    ) -> Self {
        Self {
            state,
            project: project.into(),
            character: character.into(),
            tool: None,
            model: None,
            terminal_id: None,
            extra: Map::new(),
        }
    }
}

/// Reduced payload for the cloud API. `memory` is a fixed placeholder; this
/// host has no memory telemetry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudStatus {
    pub state: LifecycleState,
    pub project: String,
    pub tool: String,
    pub model: String,
    pub memory: u64,
    pub character: String,
}

impl CloudStatus {
    /// Builds the cloud payload from a generic event. Extra fields and the
    /// terminal id are deliberately dropped; absent options become empty
    /// strings, matching what the API expects.
    pub fn from_event(event: &StatusEvent) -> Self {
        Self {
            state: event.state,
            project: event.project.clone(),
            tool: event.tool.clone().unwrap_or_default(),
            model: event.model.clone().unwrap_or_default(),
            memory: 0,
            character: event.character.clone(),
        }
    }
}
