//! Error types for reporadar
//!
//! Every failure here is recoverable from the user's point of view: the
//! launcher has no channel for nonzero exits, so `main` converts escaped
//! errors into an informational item and still exits 0.

use thiserror::Error;

/// Main error type for reporadar operations
#[derive(Error, Debug)]
pub enum RepoError {
    #[error("Settings error: {message}")]
    Settings { message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("Git error: {message}")]
    Git { message: String },

    #[error("No remote named {remote}. Available remotes: {}", .available.join(", "))]
    NoSuchRemote {
        remote: String,
        available: Vec<String>,
    },

    #[error("Not a git repository: {path}")]
    NotGitRepo { path: String },

    #[error("Failed to launch {what}: {message}")]
    Launch { what: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for reporadar operations
pub type Result<T> = std::result::Result<T, RepoError>;
