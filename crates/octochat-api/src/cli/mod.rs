//! CLI command definitions for the `octochat` binary.
//!
//! Uses clap derive macros for argument parsing. Each subcommand is a verb
//! acting on a source URL or a bot (e.g. `octochat build <url>`,
//! `octochat status <url>`).

pub mod build;
pub mod chat;
pub mod config;
pub mod delete;
pub mod status;
pub mod wait;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use indicatif::{ProgressBar, ProgressStyle};

/// Turn a website into a chatbot and talk to it.
#[derive(Parser)]
#[command(name = "octochat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Read configuration from this file instead of ~/.octochat/config.toml.
    #[arg(long, global = true, env = "OCTOCHAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write log lines to stderr as JSON objects.
    #[arg(long, global = true, env = "OCTOCHAT_LOG_JSON")]
    pub log_json: bool,

    /// Print bot replies verbatim instead of rendering markdown.
    #[arg(long, global = true)]
    pub plain: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a bot from a website, wait for it, then chat.
    Build {
        /// Source URL to build the knowledge base from.
        url: String,

        /// Exit once the bot is ready instead of starting a chat.
        #[arg(long)]
        no_chat: bool,
    },

    /// Chat with a bot that was built earlier.
    Chat {
        /// Bot name (see `octochat name <url>`).
        #[arg(long)]
        bot: String,
    },

    /// Show the build stage of the bot for a source URL.
    Status {
        /// Source URL the bot was built from.
        url: String,
    },

    /// Delete the bot built from a source URL.
    #[command(alias = "rm")]
    Delete {
        /// Source URL the bot was built from.
        url: String,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// Print the bot name the builder assigns to a source URL.
    Name {
        /// Source URL.
        url: String,
    },

    /// Show the effective configuration.
    Config,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Steady-ticking spinner used while waiting on a remote call.
pub(crate) fn spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("  {spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
