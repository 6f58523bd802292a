//! Integration tests for the reporadar CLI
//!
//! Each test runs the built binary inside a scratch home so settings and
//! cache live under a throwaway directory. Every invocation form exits 0;
//! non-fatal conditions surface in the printed output instead.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Scratch environment with isolated HOME / XDG dirs
struct TestEnv {
    home: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            home: TempDir::new().expect("create scratch home"),
        }
    }

    fn config_dir(&self) -> std::path::PathBuf {
        self.home.path().join("config").join("reporadar")
    }

    fn cache_dir(&self) -> std::path::PathBuf {
        self.home.path().join("cache").join("reporadar")
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_reporadar"))
            .args(args)
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.home.path().join("config"))
            .env("XDG_CACHE_HOME", self.home.path().join("cache"))
            .output()
            .expect("run reporadar")
    }

    fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "reporadar {:?} exited nonzero: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    /// Write a settings file pointing at a real repo tree inside the home
    fn write_settings(&self, search_path: &Path) {
        fs::create_dir_all(self.config_dir()).unwrap();
        let settings = serde_json::json!({
            "search_dirs": [{"path": search_path.to_string_lossy(), "depth": 2}],
            "global_exclude_patterns": [],
            "app_default": "Finder",
            "app_cmd": "Terminal"
        });
        fs::write(
            self.config_dir().join("settings.json"),
            settings.to_string(),
        )
        .unwrap();
    }

    /// Seed the cache slot with a freshly-timestamped entry
    fn write_cache(&self, repos: &[(&str, &str)]) {
        self.write_cache_at(repos, &chrono::Utc::now().to_rfc3339());
    }

    /// Seed the cache slot with an entry written at a given instant
    fn write_cache_at(&self, repos: &[(&str, &str)], written_at: &str) {
        fs::create_dir_all(self.cache_dir()).unwrap();
        let repos: Vec<serde_json::Value> = repos
            .iter()
            .map(|(name, path)| serde_json::json!({"name": name, "path": path}))
            .collect();
        let entry = serde_json::json!({
            "schema_version": 2,
            "written_at": written_at,
            "repos": repos
        });
        fs::write(self.cache_dir().join("repos.json"), entry.to_string()).unwrap();
    }

    /// Register a live scan task backed by a sleeper process, so the
    /// binary under test sees a scan in flight without spawning one
    fn seed_live_scan(&self) -> std::process::Child {
        let sleeper = Command::new("sleep").arg("30").spawn().unwrap();
        fs::create_dir_all(self.cache_dir()).unwrap();
        fs::write(
            self.cache_dir().join("scan.pid"),
            sleeper.id().to_string(),
        )
        .unwrap();
        sleeper
    }
}

fn parse_feedback(output: &str) -> serde_json::Value {
    serde_json::from_str(output).unwrap_or_else(|e| {
        panic!("stdout was not valid feedback JSON ({}): {}", e, output)
    })
}

#[test]
fn test_search_with_default_settings_shows_config_hint() {
    let env = TestEnv::new();
    let output = env.run_success(&["search"]);
    let feedback = parse_feedback(&output);

    let items = feedback["items"].as_array().expect("items array");
    assert_eq!(items.len(), 1);
    assert!(items[0]["title"]
        .as_str()
        .unwrap_or_default()
        .contains("haven't configured"));

    // First invocation must have created an editable settings file
    assert!(env.config_dir().join("settings.json").exists());
}

#[test]
fn test_search_renders_cached_repos() {
    let env = TestEnv::new();
    let code_dir = env.home.path().join("code");
    fs::create_dir_all(&code_dir).unwrap();

    env.write_settings(&code_dir);
    let repo_path = code_dir.join("dotfiles");
    env.write_cache(&[("dotfiles", &repo_path.to_string_lossy())]);

    let output = env.run_success(&["search"]);
    let feedback = parse_feedback(&output);
    let items = feedback["items"].as_array().expect("items array");

    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "dotfiles");
    assert_eq!(items[0]["valid"], true);
    assert_eq!(items[0]["variables"]["appkey"], "default");
    assert_eq!(items[0]["mods"]["cmd"]["valid"], true);
    assert_eq!(items[0]["mods"]["alt"]["valid"], false);
}

#[test]
fn test_search_query_filters_and_reports_no_matches() {
    let env = TestEnv::new();
    let code_dir = env.home.path().join("code");
    fs::create_dir_all(&code_dir).unwrap();

    env.write_settings(&code_dir);
    env.write_cache(&[
        ("dotfiles", "/tmp/dotfiles"),
        ("website", "/tmp/website"),
    ]);

    let output = env.run_success(&["search", "dot"]);
    let feedback = parse_feedback(&output);
    let items = feedback["items"].as_array().expect("items array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "dotfiles");

    let output = env.run_success(&["search", "zzzzzz"]);
    let feedback = parse_feedback(&output);
    let items = feedback["items"].as_array().expect("items array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "No matching repos found");
}

#[test]
fn test_search_while_first_scan_runs_shows_placeholder_and_rerun() {
    let env = TestEnv::new();
    let code_dir = env.home.path().join("code");
    fs::create_dir_all(&code_dir).unwrap();
    env.write_settings(&code_dir);

    // An empty entry counts as no data; the live pid keeps the trigger a no-op
    env.write_cache(&[]);
    let mut sleeper = env.seed_live_scan();

    let output = env.run_success(&["search"]);
    let feedback = parse_feedback(&output);

    assert_eq!(feedback["rerun"], 0.5);
    let items = feedback["items"].as_array().expect("items array");
    assert_eq!(items.len(), 1);
    assert!(items[0]["title"]
        .as_str()
        .unwrap_or_default()
        .starts_with("Updating"));

    sleeper.kill().ok();
    sleeper.wait().ok();
}

#[test]
fn test_search_with_stale_cache_still_renders_repos_with_rerun() {
    let env = TestEnv::new();
    let code_dir = env.home.path().join("code");
    fs::create_dir_all(&code_dir).unwrap();
    env.write_settings(&code_dir);

    // Entry written hours ago, well past the default budget
    let old = (chrono::Utc::now() - chrono::Duration::hours(6)).to_rfc3339();
    env.write_cache_at(&[("dotfiles", "/tmp/dotfiles")], &old);
    let mut sleeper = env.seed_live_scan();

    let output = env.run_success(&["search"]);
    let feedback = parse_feedback(&output);

    // Stale data is still rendered while the rescan runs
    let items = feedback["items"].as_array().expect("items array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "dotfiles");
    assert_eq!(feedback["rerun"], 0.5);

    sleeper.kill().ok();
    sleeper.wait().ok();
}

#[test]
fn test_open_with_unconfigured_key_prints_hint_and_exits_zero() {
    let env = TestEnv::new();
    let output = env.run_success(&["open", "alt", "/tmp/somewhere"]);
    assert!(
        output.contains("not set"),
        "expected a settings hint, got: {}",
        output
    );
}

#[test]
fn test_update_twice_keeps_a_single_background_scan() {
    let env = TestEnv::new();
    let code_dir = env.home.path().join("code");
    fs::create_dir_all(code_dir.join("repo/.git")).unwrap();
    env.write_settings(&code_dir);

    let first = env.run_success(&["update"]);
    let second = env.run_success(&["update"]);

    // At most one live scan task: the second trigger is a no-op
    assert!(
        first.contains("Scanning") || first.contains("already running"),
        "unexpected update output: {}",
        first
    );
    let pid_file = env.cache_dir().join("scan.pid");
    if second.contains("already running") {
        assert!(pid_file.exists());
    }
}
