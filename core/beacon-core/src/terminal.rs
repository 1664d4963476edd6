//! Terminal identity detection.
//!
//! Displays use the terminal id to tell sessions in different windows
//! apart. Detection is best effort from well-known environment variables.

use std::env;

pub(crate) fn terminal_id() -> Option<String> {
    if let Ok(session) = env::var("ITERM_SESSION_ID") {
        if !session.is_empty() {
            return Some(format!("iterm2:{}", session));
        }
    }

    if let Ok(pid) = env::var("GHOSTTY_PID") {
        if !pid.is_empty() {
            return Some(format!("ghostty:{}", pid));
        }
    }

    None
}
