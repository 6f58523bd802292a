//! Cache storage for the scanned repo list
//!
//! One slot (`repos.json`) under an XDG-compliant cache directory holds the
//! most recent complete scan plus its write timestamp. Writes go through a
//! temp file and an atomic rename, so a concurrent reader never observes a
//! partially-written entry. Legacy or incompatible shapes load as absent.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RepoError, Result};

/// Bumped whenever the cached shape changes; older entries are rescanned
pub const CACHE_SCHEMA_VERSION: u32 = 2;

/// File name of the repo-list cache slot
pub const CACHE_SLOT: &str = "repos.json";

/// A discovered git working directory. Identity is the path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    pub name: String,
    pub path: PathBuf,
}

/// The cached scan result plus its write timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Schema version for compatibility
    pub schema_version: u32,

    /// When this entry was written (RFC 3339)
    pub written_at: String,

    pub repos: Vec<Repo>,
}

impl CacheEntry {
    /// Create an entry timestamped now
    pub fn new(repos: Vec<Repo>) -> Self {
        Self {
            schema_version: CACHE_SCHEMA_VERSION,
            written_at: chrono::Utc::now().to_rfc3339(),
            repos,
        }
    }

    /// Age of the entry in seconds, None if the timestamp is unreadable
    pub fn age_secs(&self) -> Option<f64> {
        let written = chrono::DateTime::parse_from_rfc3339(&self.written_at).ok()?;
        let age = chrono::Utc::now().signed_duration_since(written);
        Some((age.num_milliseconds() as f64 / 1000.0).max(0.0))
    }

    /// Check if the stored shape matches what this build expects
    pub fn is_compatible(&self) -> bool {
        self.schema_version == CACHE_SCHEMA_VERSION
    }
}

/// Filesystem-backed cache slot manager
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    /// Cache store rooted at an explicit directory
    pub fn at(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Cache store at the default XDG location
    pub fn default_location() -> Self {
        Self::at(get_cache_base_dir())
    }

    /// Path of the repo-list slot
    pub fn slot_path(&self) -> PathBuf {
        self.dir.join(CACHE_SLOT)
    }

    /// Load the last complete entry.
    ///
    /// Unreadable, unparseable or schema-incompatible data (for example the
    /// legacy bare-array shape) is treated as no data at all; the caller
    /// reacts by triggering a rescan, never by surfacing an error.
    pub fn load(&self) -> Option<CacheEntry> {
        let content = fs::read_to_string(self.slot_path()).ok()?;
        let entry: CacheEntry = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("discarding unreadable cache: {}", e);
                return None;
            }
        };

        if !entry.is_compatible() {
            tracing::debug!(
                "discarding cache with schema {} (expected {})",
                entry.schema_version,
                CACHE_SCHEMA_VERSION
            );
            return None;
        }

        Some(entry)
    }

    /// Write an entry atomically: temp file in the same directory, then rename
    pub fn store(&self, entry: &CacheEntry) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let json = serde_json::to_string(entry).map_err(|e| RepoError::Cache {
            message: format!("serialize cache entry: {}", e),
        })?;

        let tmp = self.dir.join(format!("{}.tmp.{}", CACHE_SLOT, std::process::id()));
        fs::write(&tmp, json)?;
        fs::rename(&tmp, self.slot_path())?;
        Ok(())
    }

    /// Directory this store writes into
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Get the base cache directory (XDG-compliant)
pub fn get_cache_base_dir() -> PathBuf {
    if let Ok(xdg_cache) = std::env::var("XDG_CACHE_HOME") {
        return PathBuf::from(xdg_cache).join("reporadar");
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".cache").join("reporadar");
    }

    std::env::temp_dir().join("reporadar")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_repos() -> Vec<Repo> {
        vec![
            Repo {
                name: "alpha".to_string(),
                path: PathBuf::from("/home/user/code/alpha"),
            },
            Repo {
                name: "beta".to_string(),
                path: PathBuf::from("/home/user/code/beta"),
            },
        ]
    }

    #[test]
    fn test_store_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::at(dir.path().to_path_buf());

        let entry = CacheEntry::new(sample_repos());
        store.store(&entry).unwrap();

        let loaded = store.load().expect("entry should load");
        assert_eq!(loaded.repos, sample_repos());
        assert!(loaded.is_compatible());
    }

    #[test]
    fn test_fresh_entry_has_small_age() {
        let entry = CacheEntry::new(Vec::new());
        let age = entry.age_secs().expect("timestamp should parse");
        assert!(age < 5.0, "age was {}", age);
    }

    #[test]
    fn test_unreadable_timestamp_has_no_age() {
        let entry = CacheEntry {
            schema_version: CACHE_SCHEMA_VERSION,
            written_at: "not-a-timestamp".to_string(),
            repos: Vec::new(),
        };
        assert_eq!(entry.age_secs(), None);
    }

    #[test]
    fn test_legacy_array_shape_loads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::at(dir.path().to_path_buf());

        // The pre-schema cache was a bare list of path strings
        fs::write(store.slot_path(), r#"["/home/user/code/alpha"]"#).unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_incompatible_schema_loads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::at(dir.path().to_path_buf());

        let old = serde_json::json!({
            "schema_version": 1,
            "written_at": chrono::Utc::now().to_rfc3339(),
            "repos": []
        });
        fs::write(store.slot_path(), old.to_string()).unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_missing_slot_loads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::at(dir.path().to_path_buf());
        assert!(store.load().is_none());
    }
}
