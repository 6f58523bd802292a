//! Search command handler: the interactive query path
//!
//! Never blocks on a rescan. Renders whatever the freshness controller
//! hands back, and asks the launcher to re-run shortly while a scan is
//! still in flight.

use crate::background::{scan_command, SCAN_TASK};
use crate::commands::CommandContext;
use crate::error::Result;
use crate::feedback::{Feedback, Item, ICON_INFO, ICON_WARNING};
use crate::freshness::{decide, CacheDecision};
use crate::query;
use crate::settings::Settings;

/// Interval (seconds) at which the launcher polls while a scan runs
const RERUN_INTERVAL: f64 = 0.5;

/// Run the search command; returns the feedback JSON for stdout
pub fn run_search(query_str: &str, ctx: &CommandContext) -> Result<String> {
    let settings = Settings::load_or_create(&ctx.settings_path)?;
    let mut feedback = Feedback::new();

    // Can't do anything with no directories to search
    if settings.search_dirs.is_empty() || settings.is_defaults() {
        feedback.items.push(
            Item::new("You haven't configured any directories to search")
                .subtitle("Use `reporadar settings` to edit your configuration")
                .icon(ICON_WARNING),
        );
        return Ok(feedback.to_json());
    }

    let decision = decide(
        &ctx.cache,
        &ctx.settings_path,
        &ctx.registry,
        ctx.update_interval,
        &mut scan_command(),
    )?;

    let repos = match decision {
        CacheDecision::Use(entry) | CacheDecision::Stale(entry) => entry.repos,
        CacheDecision::Empty => {
            let scan_running = ctx.registry.is_running(SCAN_TASK);
            return Ok(empty_cache_feedback(scan_running).to_json());
        }
    };

    // Reload results while an update is still running
    if ctx.registry.is_running(SCAN_TASK) {
        feedback.rerun = Some(RERUN_INTERVAL);
    }

    let apps = settings.app_map();
    feedback.items = query::render(&repos, query_str, &apps);
    Ok(feedback.to_json())
}

/// Feedback shown while the cache has no usable data.
///
/// "No git repos found" is only allowed once no scan is in flight; until
/// then the placeholder plus the rerun interval keep the launcher polling.
fn empty_cache_feedback(scan_running: bool) -> Feedback {
    let mut feedback = Feedback::new();

    if scan_running {
        feedback.items.push(
            Item::new("Updating list of repos…")
                .subtitle("Should be done in a few seconds")
                .icon(ICON_INFO),
        );
        feedback.rerun = Some(RERUN_INTERVAL);
    } else {
        feedback.items.push(
            Item::new("No git repos found")
                .subtitle("Check your settings with `reporadar settings`")
                .icon(ICON_WARNING),
        );
    }

    feedback
}
