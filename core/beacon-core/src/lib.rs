//! # beacon-core
//!
//! Status dispatcher for AI coding-assistant sessions. Receives discrete
//! lifecycle events from a host, converts them into a canonical state, and
//! fans the payload out to every configured surface: a local serial device,
//! any number of HTTP endpoints, and an authenticated cloud API.
//!
//! ## Design Principles
//!
//! - **Total adapters**: no transport failure ever reaches the host's hook
//!   path. Every adapter logs and returns; the next event is the retry.
//! - **Fire and forget**: the dispatcher's synchronous portion is the
//!   debounce check, state bookkeeping, and the serial write. Network
//!   transports run as spawned tasks whose outcomes are only logged.
//! - **One instance per host process**: no hidden globals. The host builds
//!   a [`HookAdapter`] at startup and keeps it for the process lifetime.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use beacon_core::{HookAdapter, MonitorConfig};
//!
//! let adapter = HookAdapter::new(MonitorConfig::default());
//! adapter.before_tool_call("grep");
//! ```

pub mod config;
pub mod desktop;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod hooks;
pub mod schedule;

mod model;
mod terminal;
mod transport;

pub use beacon_protocol::{CloudStatus, LifecycleState, StatusEvent};
pub use config::MonitorConfig;
pub use dispatch::StatusDispatcher;
pub use error::{BeaconError, Result};
pub use hooks::HookAdapter;
pub use schedule::DoneScheduler;
