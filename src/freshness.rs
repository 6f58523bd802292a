//! Cache freshness decisions
//!
//! Decides whether the cached repo list is usable as-is, stale but
//! presentable, or absent, and triggers the out-of-process rescan without
//! ever blocking the query path. Two rules, in order:
//!
//! 1. Settings file newer than the cache: the configuration changed, so the
//!    cache is invalidated regardless of the time budget.
//! 2. Cache older than the update interval: time-budget refresh.
//!
//! Both rules compare wall-clock ages sourced from file timestamps; clock
//! skew and mtime-preserving copies can misfire them, and no stronger
//! guarantee is attempted.

use std::fs;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

use crate::background::{ProcessRegistry, SCAN_TASK};
use crate::cache::{CacheEntry, CacheStore};
use crate::error::Result;

/// Classification of the cache relative to the settings file and the budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Within budget and not invalidated; use as-is
    Fresh,
    /// Older than the update interval
    Stale,
    /// Settings changed more recently than the cache was written
    ConfigChanged,
    /// No usable entry exists
    Missing,
}

/// What the caller should render, refresh side effects already requested
#[derive(Debug)]
pub enum CacheDecision {
    /// Cache is fresh; no refresh was triggered
    Use(CacheEntry),
    /// Cache is outdated; a refresh was requested and this entry may still
    /// be rendered as provisional data
    Stale(CacheEntry),
    /// No data yet; a refresh was requested and the caller must not report
    /// "no repos" while the first scan is still outstanding
    Empty,
}

/// Pure freshness rule. `cache_age` is None when no usable entry exists.
pub fn classify(cache_age: Option<f64>, settings_age: f64, max_age: f64) -> Freshness {
    let Some(cache_age) = cache_age else {
        return Freshness::Missing;
    };

    if settings_age < cache_age {
        Freshness::ConfigChanged
    } else if cache_age > max_age {
        Freshness::Stale
    } else {
        Freshness::Fresh
    }
}

/// Decide what to do with the cache, triggering `refresh` when needed.
///
/// The refresh is spawned through the registry's start-if-absent, so
/// calling this twice results in at most one live background task.
pub fn decide(
    store: &CacheStore,
    settings_path: &Path,
    registry: &ProcessRegistry,
    update_interval: Duration,
    refresh: &mut Command,
) -> Result<CacheDecision> {
    // An entry with no repos is as useless as no entry: rescan and let the
    // caller show the in-flight placeholder instead of an empty list
    let entry = store.load().filter(|e| !e.repos.is_empty());
    let cache_age = entry.as_ref().and_then(CacheEntry::age_secs);
    let settings_age = settings_age_secs(settings_path);

    tracing::debug!(
        "cache_age={:?} settings_age={:.2} budget={:.0}",
        cache_age,
        settings_age,
        update_interval.as_secs_f64()
    );

    match (entry, classify(cache_age, settings_age, update_interval.as_secs_f64())) {
        (Some(entry), Freshness::Fresh) => Ok(CacheDecision::Use(entry)),
        (Some(entry), Freshness::Stale) => {
            tracing::info!("cache is over budget, reloading repos in the background");
            registry.start_if_absent(SCAN_TASK, refresh)?;
            Ok(CacheDecision::Stale(entry))
        }
        (Some(entry), Freshness::ConfigChanged) => {
            tracing::info!("settings were updated, reloading repos in the background");
            registry.start_if_absent(SCAN_TASK, refresh)?;
            Ok(CacheDecision::Stale(entry))
        }
        (_, Freshness::Missing) | (None, _) => {
            registry.start_if_absent(SCAN_TASK, refresh)?;
            Ok(CacheDecision::Empty)
        }
    }
}

/// Age of the settings file in seconds.
///
/// Missing file counts as infinitely old (never invalidates); an mtime in
/// the future counts as zero (always invalidates).
fn settings_age_secs(path: &Path) -> f64 {
    let Some(mtime) = fs::metadata(path).ok().and_then(|m| m.modified().ok()) else {
        return f64::INFINITY;
    };

    match mtime.elapsed() {
        Ok(age) => age.as_secs_f64(),
        Err(_) => 0.0,
    }
}
