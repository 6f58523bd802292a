//! Repo discovery walk, run out-of-process by `reporadar-scan`
//!
//! Walks each configured search directory down to its depth, treats any
//! directory containing `.git` as a repo and never descends into one.
//! Excludes are glob patterns matched against the path relative to the
//! search root, or against a single path component for bare names.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::WalkDir;

use crate::background::{ProcessRegistry, SCAN_TASK};
use crate::cache::{CacheEntry, CacheStore, Repo};
use crate::error::Result;
use crate::settings::{self, SearchDir, Settings};

/// Full out-of-process scan: read settings, walk, replace the cache slot.
/// Returns the number of repos written.
pub fn run_scan() -> Result<usize> {
    let settings = Settings::load_or_create(&settings::settings_path())?;
    let store = CacheStore::default_location();

    let repos = scan(&settings);
    let count = repos.len();
    store.store(&CacheEntry::new(repos))?;

    // Release the pid slot so the next freshness check does not wait on
    // a stale-pid probe
    let registry = ProcessRegistry::at(store.dir().to_path_buf());
    registry.clear_own(SCAN_TASK, std::process::id());

    Ok(count)
}

/// Scan every configured search dir, de-duplicated by path, sorted by name
pub fn scan(settings: &Settings) -> Vec<Repo> {
    let global = compile_patterns(&settings.global_exclude_patterns);

    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut repos = Vec::new();

    for dir in &settings.search_dirs {
        for repo in scan_dir(dir, &global) {
            if seen.insert(repo.path.clone()) {
                repos.push(repo);
            }
        }
    }

    repos.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    repos
}

fn scan_dir(dir: &SearchDir, global: &[Pattern]) -> Vec<Repo> {
    let root = expand_home(&dir.path);
    if !root.is_dir() {
        tracing::warn!("search dir {} does not exist, skipping", root.display());
        return Vec::new();
    }

    let mut patterns = compile_patterns(&dir.excludes);
    patterns.extend_from_slice(global);

    let depth = dir.depth.max(1);
    let mut repos = Vec::new();

    let mut walker = WalkDir::new(&root).min_depth(1).max_depth(depth).into_iter();
    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("walk error under {}: {}", root.display(), e);
                continue;
            }
        };

        if !entry.file_type().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') {
            walker.skip_current_dir();
            continue;
        }

        if is_excluded(entry.path(), &root, &patterns) {
            walker.skip_current_dir();
            continue;
        }

        // `.git` may be a directory or, for worktrees/submodules, a file
        if entry.path().join(".git").exists() {
            repos.push(Repo {
                name: repo_name(entry.path(), dir.name_for_parent),
                path: entry.path().to_path_buf(),
            });
            walker.skip_current_dir();
        }
    }

    repos
}

fn compile_patterns(raw: &[String]) -> Vec<Pattern> {
    raw.iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                tracing::warn!("ignoring bad exclude pattern `{}`: {}", p, e);
                None
            }
        })
        .collect()
}

fn is_excluded(path: &Path, root: &Path, patterns: &[Pattern]) -> bool {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let rel_str = rel.to_string_lossy();
    let file_name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();

    patterns
        .iter()
        .any(|p| p.matches(&rel_str) || p.matches(&file_name))
}

/// Display name for a repo: `name_for_parent` = 1 names it after its own
/// directory, 2 after its parent, and so on
fn repo_name(path: &Path, name_for_parent: usize) -> String {
    let mut current = path;
    for _ in 1..name_for_parent.max(1) {
        match current.parent() {
            Some(parent) if parent.file_name().is_some() => current = parent,
            _ => break,
        }
    }

    current
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Expand a leading `~` to the home directory
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }

    PathBuf::from(path)
}
