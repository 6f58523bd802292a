//! Git subprocess helpers and remote URL resolution
//!
//! Uses subprocess calls to git for maximum compatibility; nothing here
//! parses `.git` internals beyond asking git for the remote URL string.

use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{RepoError, Result};

/// Run a git command in `cwd` and return trimmed stdout
pub fn git_command(args: &[&str], cwd: &Path) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .map_err(|e| RepoError::Git {
            message: format!("failed to execute git: {}", e),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains("not a git repository") {
            return Err(RepoError::NotGitRepo {
                path: cwd.display().to_string(),
            });
        }
        return Err(RepoError::Git {
            message: format!("git {} failed: {}", args.join(" "), stderr.trim()),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Remotes configured for the repository at `path`
pub fn list_remotes(path: &Path) -> Result<Vec<String>> {
    let stdout = git_command(&["remote"], path)?;
    Ok(stdout.lines().map(|l| l.trim().to_string()).filter(|l| !l.is_empty()).collect())
}

/// HTTPS-style URL of the named remote for the repo at `path`.
///
/// Fails with `NoSuchRemote` (carrying the available remotes as the
/// remediation hint) when the configured name is not among the remotes.
pub fn remote_url(path: &Path, remote: &str) -> Result<String> {
    let remotes = list_remotes(path)?;
    if !remotes.iter().any(|r| r == remote) {
        return Err(RepoError::NoSuchRemote {
            remote: remote.to_string(),
            available: remotes,
        });
    }

    let raw = git_command(&["config", &format!("remote.{}.url", remote)], path)?;
    Ok(normalize_remote_url(&raw))
}

/// Normalize a conventional GitHub/GitLab-style remote to an HTTPS URL.
///
/// Best-effort string surgery, not a URL parser: strip a leading `user@`
/// or `https://`/`git://` scheme and a trailing `.git`, turn the first `:`
/// (the SSH host/path separator) into `/`, and prefix `https://`.
pub fn normalize_remote_url(raw: &str) -> String {
    static STRIP: OnceLock<Regex> = OnceLock::new();
    let strip = STRIP.get_or_init(|| {
        Regex::new(r"(^.+@)|(^https://)|(^git://)|(\.git$)").expect("static regex")
    });

    let stripped = strip.replace_all(raw.trim(), "");
    format!("https://{}", stripped.replacen(':', "/", 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_ssh_remote() {
        assert_eq!(
            normalize_remote_url("git@github.com:org/repo.git"),
            "https://github.com/org/repo"
        );
    }

    #[test]
    fn test_normalize_https_remote() {
        assert_eq!(
            normalize_remote_url("https://github.com/org/repo.git"),
            "https://github.com/org/repo"
        );
    }

    #[test]
    fn test_normalize_git_scheme_remote() {
        assert_eq!(
            normalize_remote_url("git://github.com/org/repo.git"),
            "https://github.com/org/repo"
        );
    }

    #[test]
    fn test_normalize_keeps_nested_groups() {
        assert_eq!(
            normalize_remote_url("git@gitlab.com:group/sub/repo.git\n"),
            "https://gitlab.com/group/sub/repo"
        );
    }

    #[test]
    fn test_normalize_without_git_suffix() {
        assert_eq!(
            normalize_remote_url("https://github.com/org/repo"),
            "https://github.com/org/repo"
        );
    }

    #[test]
    fn test_remote_url_outside_a_repo_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = remote_url(dir.path(), "origin").unwrap_err();
        assert!(
            matches!(err, RepoError::NotGitRepo { .. } | RepoError::Git { .. }),
            "unexpected error: {:?}",
            err
        );
    }
}
