//! Launcher feedback payload (Script Filter JSON)
//!
//! The data contract each result must satisfy: a title, an optional
//! subtitle and argument, a stable uid for selection state, a validity
//! flag, per-modifier secondary actions and an optional `rerun` interval
//! that asks the launcher to re-invoke us while a scan is in flight.
//! Serialized once to stdout; nothing else may be printed there.

use std::collections::BTreeMap;

use serde::Serialize;

/// System icon shown on informational items
pub const ICON_INFO: &str =
    "/System/Library/CoreServices/CoreTypes.bundle/Contents/Resources/ToolbarInfo.icns";

/// System icon shown on warning items
pub const ICON_WARNING: &str =
    "/System/Library/CoreServices/CoreTypes.bundle/Contents/Resources/AlertCautionIcon.icns";

/// Bundled workflow icon used for repo items
pub const ICON_REPO: &str = "icon.png";

/// Top-level feedback document
#[derive(Debug, Default, Serialize)]
pub struct Feedback {
    pub items: Vec<Item>,

    /// Seconds after which the launcher should re-run the query
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rerun: Option<f64>,
}

impl Feedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize for the launcher; the payload must always be valid JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            tracing::error!("feedback serialization failed: {}", e);
            r#"{"items":[]}"#.to_string()
        })
    }
}

/// One launcher result row
#[derive(Debug, Clone, Serialize)]
pub struct Item {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    /// Action payload handed back on selection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg: Option<String>,

    /// Stable identifier for de-duplication and selection state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    pub valid: bool,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, String>,

    /// Secondary actions keyed by modifier
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub mods: BTreeMap<String, Modifier>,
}

impl Item {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            arg: None,
            uid: None,
            valid: false,
            item_type: None,
            icon: None,
            variables: BTreeMap::new(),
            mods: BTreeMap::new(),
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.arg = Some(arg.into());
        self
    }

    pub fn uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    pub fn valid(mut self, valid: bool) -> Self {
        self.valid = valid;
        self
    }

    /// Mark the item as a file entry (enables file actions in the launcher)
    pub fn file_type(mut self) -> Self {
        self.item_type = Some("file".to_string());
        self
    }

    pub fn icon(mut self, path: impl Into<String>) -> Self {
        self.icon = Some(Icon { path: path.into() });
        self
    }

    pub fn var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn add_modifier(&mut self, key: impl Into<String>, modifier: Modifier) {
        self.mods.insert(key.into(), modifier);
    }
}

/// Secondary action attached to an item under one modifier key
#[derive(Debug, Clone, Serialize)]
pub struct Modifier {
    pub subtitle: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg: Option<String>,

    pub valid: bool,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, String>,
}

impl Modifier {
    pub fn new(subtitle: impl Into<String>, arg: Option<String>, valid: bool) -> Self {
        Self {
            subtitle: subtitle.into(),
            arg,
            valid,
            variables: BTreeMap::new(),
        }
    }

    pub fn var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }
}

/// Icon reference, a filesystem path
#[derive(Debug, Clone, Serialize)]
pub struct Icon {
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fields_are_omitted() {
        let mut feedback = Feedback::new();
        feedback.items.push(Item::new("hello"));

        let json = feedback.to_json();
        assert!(json.contains(r#""title":"hello""#));
        assert!(!json.contains("rerun"));
        assert!(!json.contains("subtitle"));
        assert!(!json.contains("mods"));
    }

    #[test]
    fn test_full_item_round_trips_through_json() {
        let mut item = Item::new("repo")
            .subtitle("~/code/repo //  Finder")
            .arg("/home/u/code/repo")
            .uid("/home/u/code/repo")
            .valid(true)
            .file_type()
            .icon(ICON_REPO)
            .var("appkey", "default");
        item.add_modifier(
            "cmd",
            Modifier::new("~/code/repo  //  Open in Terminal", Some("/home/u/code/repo".into()), true)
                .var("appkey", "cmd"),
        );

        let mut feedback = Feedback::new();
        feedback.rerun = Some(0.5);
        feedback.items.push(item);

        let value: serde_json::Value = serde_json::from_str(&feedback.to_json()).unwrap();
        assert_eq!(value["rerun"], 0.5);
        assert_eq!(value["items"][0]["type"], "file");
        assert_eq!(value["items"][0]["variables"]["appkey"], "default");
        assert_eq!(value["items"][0]["mods"]["cmd"]["valid"], true);
        assert_eq!(value["items"][0]["mods"]["cmd"]["variables"]["appkey"], "cmd");
    }
}
