//! Command handlers for the reporadar CLI
//!
//! One module per subcommand. Every handler takes the shared
//! `CommandContext`, which is constructed once per invocation in `main`
//! and owns all the paths and collaborators the handlers touch.

pub mod open;
pub mod search;
pub mod settings;
pub mod update;

pub use open::run_open;
pub use search::run_search;
pub use settings::run_settings;
pub use update::run_update;

use std::path::PathBuf;
use std::time::Duration;

use crate::background::ProcessRegistry;
use crate::cache::{get_cache_base_dir, CacheStore};
use crate::settings::settings_path;

/// Shared per-invocation context passed to all command handlers
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Location of the user-editable settings file
    pub settings_path: PathBuf,

    /// Cache slot holding the last complete scan
    pub cache: CacheStore,

    /// Registry coordinating the background scan task
    pub registry: ProcessRegistry,

    /// Time budget before cached repos count as stale
    pub update_interval: Duration,
}

impl CommandContext {
    /// Build the context from the environment-derived default locations
    pub fn from_env(update_every_mins: u64) -> Self {
        let cache_dir = get_cache_base_dir();
        Self {
            settings_path: settings_path(),
            cache: CacheStore::at(cache_dir.clone()),
            registry: ProcessRegistry::at(cache_dir),
            update_interval: Duration::from_secs(update_every_mins * 60),
        }
    }
}
