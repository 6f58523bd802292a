//! reporadar: find, open and search Git repos from your launcher
//!
//! The interesting part is the cache freshness protocol: each invocation is
//! a short-lived process that reads a filesystem-backed cache of discovered
//! repos, decides whether that data is fresh, stale or missing, triggers an
//! out-of-process rescan when needed without ever blocking the query path,
//! and renders launcher items for whatever data it has.
//!
//! Module map:
//! - [`freshness`]: the cache-staleness rules and refresh triggering
//! - [`background`]: pid-file registry for the detached scan task
//! - [`cache`]: the atomic repo-list cache slot
//! - [`scanner`]: the directory walk run by the `reporadar-scan` binary
//! - [`query`] / [`matcher`] / [`feedback`]: filtering and item rendering
//! - [`dispatch`] / [`git`]: opening a repo, resolving remote URLs
//! - [`settings`]: the typed, user-editable configuration file

pub mod background;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod dispatch;
pub mod error;
pub mod feedback;
pub mod freshness;
pub mod git;
pub mod matcher;
pub mod query;
pub mod scanner;
pub mod settings;

// Re-export commonly used types
pub use cache::{CacheEntry, CacheStore, Repo};
pub use cli::{Cli, Commands};
pub use error::{RepoError, Result};
pub use freshness::{classify, decide, CacheDecision, Freshness};
pub use settings::{AppMap, Settings};
