//! Dispatch a chosen repo to the configured application(s)
//!
//! Browser-class applications receive the repo's remote URL instead of the
//! local path. One application failing never stops the rest of the
//! configured sequence; failures surface as a notification plus a log
//! entry, since the launcher shows no stderr.

use std::path::Path;
use std::process::Command;

use crate::error::RepoError;
use crate::git;
use crate::settings::AppMap;

/// Applications passed the remote repo URL instead of the local path.
/// `Browser` stands for the system default browser.
pub const BROWSERS: [&str; 5] = ["Browser", "Google Chrome", "Firefox", "Safari", "WebKit"];

/// Result of one dispatch request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No application is configured for the requested key; nothing was
    /// attempted and the caller prints a settings hint
    NotConfigured { appkey: String },
    /// The configured sequence was attempted app by app
    Launched { attempted: usize, failed: usize },
}

/// True for applications that open the remote URL
pub fn is_browser(app: &str) -> bool {
    BROWSERS.contains(&app)
}

/// Open `path` with every application mapped to `appkey`, in configured
/// order. `remote` names the git remote resolved for browser-class apps.
pub fn open_repo(appkey: &str, path: &Path, apps: &AppMap, remote: &str) -> DispatchOutcome {
    let Some(list) = apps.get(appkey) else {
        return DispatchOutcome::NotConfigured {
            appkey: appkey.to_string(),
        };
    };

    let mut attempted = 0;
    let mut failed = 0;

    for app in list {
        attempted += 1;

        let target = if is_browser(app) {
            match git::remote_url(path, remote) {
                Ok(url) => url,
                Err(e) => {
                    // Skip this app, let the rest of the sequence proceed
                    report_remote_failure(&e, path);
                    failed += 1;
                    continue;
                }
            }
        } else {
            path.display().to_string()
        };

        tracing::info!("opening {} with {}", target, app);
        if let Err(e) = open_target(app, &target) {
            tracing::error!("{}", e);
            failed += 1;
        }
    }

    DispatchOutcome::Launched { attempted, failed }
}

fn report_remote_failure(err: &RepoError, path: &Path) {
    tracing::error!("remote resolution failed for {}: {}", path.display(), err);
    match err {
        RepoError::NoSuchRemote { remote, available } => notify(
            &format!("No remote named {}", remote),
            &format!(
                "Check your settings. Available remotes: {}",
                available.join(", ")
            ),
        ),
        other => notify("Could not resolve repo URL", &other.to_string()),
    }
}

/// Open a target with an application via the system opener. `Browser`
/// means the default handler, so no `-a` is passed.
fn open_target(app: &str, target: &str) -> crate::error::Result<()> {
    let mut cmd = Command::new("open");
    if app != "Browser" {
        cmd.args(["-a", app]);
    }
    cmd.arg(target);

    let status = cmd.status().map_err(|e| RepoError::Launch {
        what: app.to_string(),
        message: e.to_string(),
    })?;

    if !status.success() {
        return Err(RepoError::Launch {
            what: app.to_string(),
            message: format!("open exited with {}", status),
        });
    }

    Ok(())
}

/// Best-effort user-visible notification; failures only get logged
pub fn notify(title: &str, message: &str) {
    let script = format!(
        "display notification \"{}\" with title \"{}\"",
        message.replace('"', "'"),
        title.replace('"', "'")
    );
    if let Err(e) = Command::new("osascript").args(["-e", &script]).status() {
        tracing::debug!("notification failed: {}", e);
    }
}
