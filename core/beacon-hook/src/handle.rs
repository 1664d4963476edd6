//! Event loop for host lifecycle callbacks.
//!
//! The host writes one JSON object per line to stdin:
//!
//! ```json
//! {"event": "before_tool_call", "tool": "grep"}
//! {"event": "message_sent", "success": true}
//! ```
//!
//! Events map 1:1 onto [`HookAdapter`] callbacks. Malformed lines and
//! unknown events are logged and skipped; nothing here may break the
//! host's pipe.

use beacon_core::{HookAdapter, LifecycleState, MonitorConfig};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Deserialize)]
struct HookInput {
    event: String,
    #[serde(default)]
    tool: Option<String>,
    #[serde(default)]
    success: Option<bool>,
}

/// Runs the event loop until stdin closes. Reading is async so the
/// delayed-done timer keeps ticking between events.
pub async fn run(config: MonitorConfig) {
    let adapter = HookAdapter::new(config);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(error) => {
                tracing::warn!(%error, "failed to read stdin");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<HookInput>(&line) {
            Ok(input) => apply(&adapter, input).await,
            Err(error) => tracing::warn!(%error, "malformed hook event line"),
        }
    }

    // Give in-flight transport tasks a moment to settle before exit.
    tokio::task::yield_now().await;
}

/// One-shot dispatch for the `send` subcommand.
pub async fn send_once(
    config: MonitorConfig,
    state: LifecycleState,
    tool: Option<String>,
    note: Option<String>,
) {
    let adapter = HookAdapter::new(config);

    let mut extra = Map::new();
    if let Some(tool) = tool {
        extra.insert("tool".to_string(), json!(tool));
    }
    if let Some(note) = note {
        extra.insert("note".to_string(), json!(note));
    }
    adapter.dispatch(state, extra);

    // The dispatch itself is fire-and-forget; wait for the fan-out here so
    // the one-shot process doesn't exit with requests still in flight.
    tokio::time::sleep(std::time::Duration::from_millis(500)).await;
}

async fn apply(adapter: &HookAdapter, input: HookInput) {
    tracing::debug!(event = %input.event, tool = ?input.tool, "hook event");

    match input.event.as_str() {
        "gateway_start" => adapter.gateway_start().await,
        "before_agent_start" => adapter.before_agent_start(),
        "before_tool_call" => adapter.before_tool_call(input.tool.as_deref().unwrap_or("")),
        "after_tool_call" => adapter.after_tool_call(input.tool.as_deref().unwrap_or("")),
        // A missing success field means the host had nothing to complain
        // about; only explicit failures suppress the schedule.
        "message_sent" => adapter.message_sent(input.success.unwrap_or(true)),
        "agent_end" => adapter.agent_end(input.success.unwrap_or(true)),
        "session_end" => adapter.session_end(),
        "gateway_stop" => adapter.gateway_stop(),
        other => tracing::debug!(event = %other, "unhandled hook event"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> HookInput {
        serde_json::from_str(line).unwrap()
    }

    #[test]
    fn decodes_minimal_event_line() {
        let input = parse(r#"{"event": "before_agent_start"}"#);
        assert_eq!(input.event, "before_agent_start");
        assert_eq!(input.tool, None);
        assert_eq!(input.success, None);
    }

    #[test]
    fn decodes_tool_and_success_fields() {
        let input = parse(r#"{"event": "before_tool_call", "tool": "grep"}"#);
        assert_eq!(input.tool.as_deref(), Some("grep"));

        let input = parse(r#"{"event": "message_sent", "success": false}"#);
        assert_eq!(input.success, Some(false));
    }

    #[test]
    fn rejects_lines_without_an_event() {
        assert!(serde_json::from_str::<HookInput>(r#"{"tool": "grep"}"#).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn event_sequence_drives_the_dispatcher() {
        let adapter = HookAdapter::new(MonitorConfig::default());

        apply(&adapter, parse(r#"{"event": "before_agent_start"}"#)).await;
        assert_eq!(
            adapter.dispatcher().current_state(),
            Some(LifecycleState::Thinking)
        );

        apply(
            &adapter,
            parse(r#"{"event": "before_tool_call", "tool": "grep"}"#),
        )
        .await;
        assert_eq!(
            adapter.dispatcher().current_state(),
            Some(LifecycleState::Working)
        );

        apply(&adapter, parse(r#"{"event": "message_sent"}"#)).await;
        tokio::time::sleep(std::time::Duration::from_millis(3100)).await;
        assert_eq!(
            adapter.dispatcher().current_state(),
            Some(LifecycleState::Done)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_events_change_nothing() {
        let adapter = HookAdapter::new(MonitorConfig::default());
        apply(&adapter, parse(r#"{"event": "mystery"}"#)).await;
        assert_eq!(adapter.dispatcher().current_state(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn gateway_stop_is_immediate_done() {
        let adapter = HookAdapter::new(MonitorConfig::default());
        apply(&adapter, parse(r#"{"event": "message_sent"}"#)).await;
        apply(&adapter, parse(r#"{"event": "gateway_stop"}"#)).await;
        assert_eq!(
            adapter.dispatcher().current_state(),
            Some(LifecycleState::Done)
        );
    }
}
