//! Model name lookup from the statusline cache file.
//!
//! The statusline tooling maintains a JSON cache keyed by project:
//!
//! ```json
//! {
//!   "my-project": { "model": "Opus 4.5", "memory": 62 }
//! }
//! ```
//!
//! This module is a pure lookup; the dispatcher memoizes the result for the
//! process lifetime. The cache is deliberately non-reactive: the model is
//! assumed stable for the life of the host process, so a changed file is
//! never re-read once a non-empty value has been resolved.

use std::path::PathBuf;

use fs_err as fs;
use serde_json::Value;

use crate::config::MonitorConfig;

const DEFAULT_CACHE_FILE: &str = ".claude/cache/statusline.json";

/// Reads the short model name for the configured project. Any missing or
/// malformed layer resolves to `None`; a later dispatch retries.
pub(crate) fn resolve(config: &MonitorConfig) -> Option<String> {
    let path = cache_path(config)?;
    let raw = fs::read_to_string(&path).ok()?;
    let cache: Value = serde_json::from_str(&raw).ok()?;

    cache
        .get(&config.project)?
        .get("model")?
        .as_str()
        .map(str::trim)
        .filter(|model| !model.is_empty())
        .map(str::to_string)
}

fn cache_path(config: &MonitorConfig) -> Option<PathBuf> {
    if let Some(path) = &config.model_cache_path {
        return Some(path.clone());
    }
    dirs::home_dir().map(|home| home.join(DEFAULT_CACHE_FILE))
}
