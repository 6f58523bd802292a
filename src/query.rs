//! Query engine: turn the cached repo list and a query into launcher items
//!
//! Pure presentation logic. The only I/O allowed here is reading the HOME
//! environment value used to abbreviate paths.

use std::path::Path;

use crate::cache::Repo;
use crate::feedback::{Item, Modifier, ICON_REPO, ICON_WARNING};
use crate::matcher;
use crate::settings::AppMap;

/// Render repos matching `query` as launcher items, one per repo.
///
/// An empty query lists everything, order preserved. An empty match result
/// yields exactly one informational item, never an empty list.
pub fn render(repos: &[Repo], query: &str, apps: &AppMap) -> Vec<Item> {
    let matched: Vec<&Repo> = if query.is_empty() {
        repos.iter().collect()
    } else {
        matcher::filter(query, repos, |r| r.name.as_str(), matcher::MIN_SCORE)
    };

    if !query.is_empty() {
        tracing::info!("{}/{} repos match `{}`", matched.len(), repos.len(), query);
    }

    if matched.is_empty() {
        return vec![no_matches_item()];
    }

    let home = std::env::var("HOME").unwrap_or_default();
    matched.into_iter().map(|repo| repo_item(repo, &home, apps)).collect()
}

/// Informational item shown when the query excludes every repo
fn no_matches_item() -> Item {
    Item::new("No matching repos found").icon(ICON_WARNING)
}

fn repo_item(repo: &Repo, home: &str, apps: &AppMap) -> Item {
    let path = repo.path.to_string_lossy();
    let pretty_path = abbreviate_home(&path, home);

    let default_apps = apps.get("default");
    let subtitle = match default_apps {
        Some(list) => format!("{} //  {}", pretty_path, join_english(list)),
        None => pretty_path.clone(),
    };

    let mut item = Item::new(&repo.name)
        .subtitle(subtitle)
        .arg(path.as_ref())
        .uid(path.as_ref())
        .valid(default_apps.is_some())
        .file_type()
        .icon(ICON_REPO)
        .var("appkey", "default");

    for (key, apps_for_key) in apps.entries() {
        if key == "default" {
            continue;
        }

        let (hint, valid) = match apps_for_key {
            Some(list) => (format!("Open in {}", join_english(list)), true),
            None => (
                format!("App for {} not set. Use `reporadar settings` to set it.", key),
                false,
            ),
        };

        item.add_modifier(
            key.replace('_', "+"),
            Modifier::new(
                format!("{}  //  {}", pretty_path, hint),
                Some(path.to_string()),
                valid,
            )
            .var("appkey", key),
        );
    }

    item
}

/// Replace the home-directory prefix with `~`
fn abbreviate_home(path: &str, home: &str) -> String {
    if home.is_empty() {
        return path.to_string();
    }

    match Path::new(path).strip_prefix(home) {
        Ok(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Ok(rest) => format!("~/{}", rest.display()),
        Err(_) => path.to_string(),
    }
}

/// Join names with commas and/or 'and'
pub fn join_english(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [one] => one.clone(),
        [a, b] => format!("{} and {}", a, b),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}
