//! Typed settings store backed by a user-editable JSON file
//!
//! The file is created with placeholder defaults on first load and mutated
//! only by external editing; the core reads it fresh on every invocation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RepoError, Result};

/// Placeholder search path shipped in the default settings
pub const DEFAULT_SEARCH_PATH: &str = "~/delete/this/example";

/// Application used when `app_default` is unset
pub const FALLBACK_APP: &str = "Finder";

/// Modifier keys recognized by the launcher, `default` first
pub const MODIFIER_KEYS: [&str; 6] = ["default", "cmd", "alt", "ctrl", "shift", "fn"];

/// One directory tree to search for git repos
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchDir {
    /// Root of the tree; a leading `~` is expanded to the home directory
    pub path: String,

    /// How many levels below the root to look for repos
    #[serde(default = "default_depth")]
    pub depth: usize,

    /// Which directory names the repo: 1 = the repo directory itself,
    /// 2 = its parent, and so on
    #[serde(default = "default_name_for_parent")]
    pub name_for_parent: usize,

    /// Glob patterns excluded from this tree only
    #[serde(default)]
    pub excludes: Vec<String>,
}

fn default_depth() -> usize {
    2
}

fn default_name_for_parent() -> usize {
    1
}

/// A single application name or a list of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AppValue {
    One(String),
    Many(Vec<String>),
}

impl AppValue {
    /// Normalize to a list, dropping empty names
    pub fn to_list(&self) -> Vec<String> {
        let list = match self {
            AppValue::One(app) => vec![app.clone()],
            AppValue::Many(apps) => apps.clone(),
        };
        list.into_iter().filter(|a| !a.trim().is_empty()).collect()
    }
}

/// Persisted configuration, read-only to the core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub search_dirs: Vec<SearchDir>,

    /// Glob patterns excluded from every search dir
    #[serde(default)]
    pub global_exclude_patterns: Vec<String>,

    /// Remote whose URL browser-class apps open (default: origin)
    #[serde(default)]
    pub remote_name: Option<String>,

    #[serde(default)]
    pub app_default: Option<AppValue>,
    #[serde(default)]
    pub app_cmd: Option<AppValue>,
    #[serde(default)]
    pub app_alt: Option<AppValue>,
    #[serde(default)]
    pub app_ctrl: Option<AppValue>,
    #[serde(default)]
    pub app_shift: Option<AppValue>,
    #[serde(default)]
    pub app_fn: Option<AppValue>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            search_dirs: vec![SearchDir {
                path: DEFAULT_SEARCH_PATH.to_string(),
                depth: 2,
                name_for_parent: 1,
                excludes: vec!["tmp".to_string(), "bad/smell/*".to_string()],
            }],
            global_exclude_patterns: Vec::new(),
            remote_name: None,
            app_default: Some(AppValue::One(FALLBACK_APP.to_string())),
            app_cmd: Some(AppValue::One("Terminal".to_string())),
            app_alt: None,
            app_ctrl: None,
            app_shift: None,
            app_fn: None,
        }
    }
}

impl Settings {
    /// Load settings, writing the defaults first if the file does not exist
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            let settings = Self::default();
            settings.save(path)?;
            return Ok(settings);
        }

        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| RepoError::Settings {
            message: format!("{}: {}", path.display(), e),
        })
    }

    /// Write settings as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| RepoError::Settings {
            message: format!("serialize settings: {}", e),
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    /// True if the settings are the do-nothing placeholder defaults
    pub fn is_defaults(&self) -> bool {
        self.search_dirs.len() == 1 && self.search_dirs[0].path == DEFAULT_SEARCH_PATH
    }

    /// Remote name to resolve for browser-class apps
    pub fn remote_name(&self) -> &str {
        match self.remote_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => "origin",
        }
    }

    /// Configured value for one modifier key
    fn app_for(&self, key: &str) -> Option<&AppValue> {
        match key {
            "default" => self.app_default.as_ref(),
            "cmd" => self.app_cmd.as_ref(),
            "alt" => self.app_alt.as_ref(),
            "ctrl" => self.app_ctrl.as_ref(),
            "shift" => self.app_shift.as_ref(),
            "fn" => self.app_fn.as_ref(),
            _ => None,
        }
    }

    /// Build the modifier-key to application mapping for this invocation
    pub fn app_map(&self) -> AppMap {
        let mut map = BTreeMap::new();
        for key in MODIFIER_KEYS {
            let apps = self.app_for(key).map(AppValue::to_list).filter(|l| !l.is_empty());
            map.insert(key.to_string(), apps);
        }

        // Things will break if default isn't set
        if map.get("default").map(|v| v.is_none()).unwrap_or(true) {
            map.insert("default".to_string(), Some(vec![FALLBACK_APP.to_string()]));
        }

        AppMap(map)
    }
}

/// Derived mapping from modifier key to zero or more applications.
///
/// Every known key is present even when unconfigured, so the query engine
/// can attach an invalid hint modifier instead of silently dropping it.
#[derive(Debug, Clone, Default)]
pub struct AppMap(BTreeMap<String, Option<Vec<String>>>);

impl AppMap {
    /// Applications for a key, None when absent or unconfigured
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).and_then(|v| v.as_deref())
    }

    /// All keys with their (possibly unset) applications
    pub fn entries(&self) -> impl Iterator<Item = (&str, Option<&[String]>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }
}

/// Base directory for the settings file (XDG-compliant)
pub fn get_config_base_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg_config).join("reporadar");
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".config").join("reporadar");
    }

    std::env::temp_dir().join("reporadar")
}

/// Path to settings.json
pub fn settings_path() -> PathBuf {
    get_config_base_dir().join("settings.json")
}
