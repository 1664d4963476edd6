//! beacon-hook: host-facing CLI for beacon session status dispatch.
//!
//! The host pipes lifecycle events into `beacon-hook handle` as one JSON
//! object per line; the process keeps a single dispatcher alive for its
//! lifetime so debounce and the delayed-done timer work across events.
//!
//! ## Subcommands
//!
//! - `handle`: event loop, reads line-delimited JSON from stdin until EOF
//! - `send`: one-shot dispatch, for manually testing a configured surface
//! - `device`: print the discovered serial device path

mod env_config;
mod handle;
mod logging;

use beacon_core::LifecycleState;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "beacon-hook")]
#[command(about = "Session status dispatcher for AI coding assistants")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Handle host lifecycle events (reads line-delimited JSON from stdin)
    Handle,

    /// Dispatch a single state to every configured surface
    Send {
        /// Lifecycle state (start, thinking, working, packing,
        /// notification, done, planning)
        #[arg(value_name = "STATE")]
        state: LifecycleState,

        /// Tool name to attach (only meaningful for "working")
        #[arg(long)]
        tool: Option<String>,

        /// Free-text note forwarded in the generic payload
        #[arg(long)]
        note: Option<String>,
    },

    /// Print the discovered serial device path, if any
    Device,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    env_config::load_env_file();
    let config = env_config::from_env();
    let _logging_guard = logging::init(config.debug);

    match cli.command {
        Commands::Handle => handle::run(config).await,
        Commands::Send { state, tool, note } => handle::send_once(config, state, tool, note).await,
        Commands::Device => match beacon_core::device::find() {
            Some(path) => println!("{}", path.display()),
            None => {
                eprintln!("no writable serial device found");
                std::process::exit(1);
            }
        },
    }
}
