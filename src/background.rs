//! Pid-file process registry for detached background tasks
//!
//! Coordination between invocations is entirely filesystem-backed: one named
//! pid file per task under the cache directory, a `kill -0` liveness probe,
//! and an idempotent start-if-absent operation. At most one task per name is
//! live; should two ever race past the check, both converge on the same
//! cache slot through atomic writes.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::{RepoError, Result};

/// Name of the background rescan task
pub const SCAN_TASK: &str = "scan";

/// Result of a start-if-absent request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new task was spawned with this pid
    Started(u32),
    /// A task with this name is already live; nothing was spawned
    AlreadyRunning(u32),
}

/// Registry of named background tasks, one pid file each
#[derive(Debug, Clone)]
pub struct ProcessRegistry {
    dir: PathBuf,
}

impl ProcessRegistry {
    pub fn at(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn pid_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.pid", name))
    }

    /// Pid of the live task with this name, if any. Stale pid files
    /// (process gone) are removed on the way.
    pub fn live_pid(&self, name: &str) -> Option<u32> {
        let path = self.pid_path(name);
        let pid: u32 = fs::read_to_string(&path).ok()?.trim().parse().ok()?;

        if process_alive(pid) {
            return Some(pid);
        }

        let _ = fs::remove_file(&path);
        None
    }

    /// True while a task with this name is running
    pub fn is_running(&self, name: &str) -> bool {
        self.live_pid(name).is_some()
    }

    /// Spawn a detached task unless one with this name is already live.
    ///
    /// The child is fully detached (own process group, no inherited stdio)
    /// so the short-lived caller can exit immediately.
    pub fn start_if_absent(&self, name: &str, cmd: &mut Command) -> Result<StartOutcome> {
        if let Some(pid) = self.live_pid(name) {
            tracing::debug!("task {} already running as pid {}", name, pid);
            return Ok(StartOutcome::AlreadyRunning(pid));
        }

        fs::create_dir_all(&self.dir)?;

        cmd.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        let child = cmd.spawn().map_err(|e| RepoError::Launch {
            what: format!("background task {}", name),
            message: e.to_string(),
        })?;

        let pid = child.id();
        self.write_pid(name, pid)?;
        tracing::info!("started background task {} as pid {}", name, pid);
        Ok(StartOutcome::Started(pid))
    }

    /// Remove the pid file for this task if it records the given pid.
    /// Called by the task itself on clean exit.
    pub fn clear_own(&self, name: &str, pid: u32) {
        let path = self.pid_path(name);
        let recorded = fs::read_to_string(&path)
            .ok()
            .and_then(|s| s.trim().parse::<u32>().ok());
        if recorded == Some(pid) {
            let _ = fs::remove_file(&path);
        }
    }

    fn write_pid(&self, name: &str, pid: u32) -> Result<()> {
        let tmp = self.dir.join(format!("{}.pid.tmp.{}", name, std::process::id()));
        fs::write(&tmp, pid.to_string())?;
        fs::rename(&tmp, self.pid_path(name))?;
        Ok(())
    }
}

/// Probe whether a pid is alive via `kill -0`
fn process_alive(pid: u32) -> bool {
    Command::new("kill")
        .args(["-0", &pid.to_string()])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Command invoking the scanner binary, preferring the sibling of the
/// current executable and falling back to PATH lookup
pub fn scan_command() -> Command {
    let name = "reporadar-scan";
    let sibling = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.join(name)))
        .filter(|p| p.exists());

    match sibling {
        Some(path) => Command::new(path),
        None => Command::new(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_if_absent_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ProcessRegistry::at(dir.path().to_path_buf());

        let first = registry
            .start_if_absent("demo", Command::new("sleep").arg("5"))
            .unwrap();
        let StartOutcome::Started(pid) = first else {
            panic!("first call should start a task, got {:?}", first);
        };

        // Second trigger while live is a no-op
        let second = registry
            .start_if_absent("demo", Command::new("sleep").arg("5"))
            .unwrap();
        assert_eq!(second, StartOutcome::AlreadyRunning(pid));
        assert!(registry.is_running("demo"));
    }

    #[test]
    fn test_stale_pid_file_is_cleaned_up() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ProcessRegistry::at(dir.path().to_path_buf());

        // Reap a short-lived child so its pid is guaranteed dead
        let mut child = Command::new("true").spawn().unwrap();
        let dead_pid = child.id();
        child.wait().unwrap();

        fs::create_dir_all(dir.path()).unwrap();
        fs::write(dir.path().join("demo.pid"), dead_pid.to_string()).unwrap();

        assert!(!registry.is_running("demo"));
        assert!(!dir.path().join("demo.pid").exists());

        // A fresh start succeeds after cleanup
        let outcome = registry
            .start_if_absent("demo", Command::new("sleep").arg("5"))
            .unwrap();
        assert!(matches!(outcome, StartOutcome::Started(_)));
    }

    #[test]
    fn test_clear_own_only_removes_matching_pid() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ProcessRegistry::at(dir.path().to_path_buf());

        fs::create_dir_all(dir.path()).unwrap();
        fs::write(dir.path().join("demo.pid"), "12345").unwrap();

        registry.clear_own("demo", 99999);
        assert!(dir.path().join("demo.pid").exists());

        registry.clear_own("demo", 12345);
        assert!(!dir.path().join("demo.pid").exists());
    }

    #[test]
    fn test_not_running_without_pid_file() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ProcessRegistry::at(dir.path().to_path_buf());
        assert!(!registry.is_running("demo"));
    }
}
