//! CLI argument definitions using clap with subcommand architecture
//!
//! Four invocation forms, mirroring what the launcher script filter calls:
//! `search [<query>]`, `settings`, `update` and `open <appkey> <path>`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// How often to check for new/updated repos, in minutes
pub const DEFAULT_UPDATE_INTERVAL_MINS: u64 = 180;

/// Find, open and search Git repos from your launcher
#[derive(Parser, Debug)]
#[command(name = "reporadar")]
#[command(about = "Find, open and search Git repos on your system")]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Rescan budget in minutes; cached repos older than this trigger a
    /// background refresh
    #[arg(
        long,
        env = "REPORADAR_UPDATE_EVERY_MINS",
        default_value_t = DEFAULT_UPDATE_INTERVAL_MINS,
        global = true,
        value_name = "MINS"
    )]
    pub update_every_mins: u64,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands for reporadar
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Filter the cached repo list and print launcher feedback
    Search {
        /// Free-text query; omit to list every cached repo
        query: Option<String>,
    },

    /// Open the settings file in its default editor
    Settings,

    /// Trigger a background rescan unconditionally
    Update,

    /// Open a repo with the application(s) mapped to a modifier key
    Open {
        /// Modifier key (default, cmd, alt, ctrl, shift, fn)
        appkey: String,

        /// Absolute path of the repo to open
        path: PathBuf,
    },
}
