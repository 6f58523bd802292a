//! Open command handler: dispatch a chosen repo to the mapped application(s)

use std::path::Path;

use crate::commands::CommandContext;
use crate::dispatch::{open_repo, DispatchOutcome};
use crate::error::Result;
use crate::settings::Settings;

/// Run the open command. Non-fatal outcomes come back as printed hints,
/// never as a nonzero exit.
pub fn run_open(appkey: &str, path: &Path, ctx: &CommandContext) -> Result<String> {
    let settings = Settings::load_or_create(&ctx.settings_path)?;
    let apps = settings.app_map();

    match open_repo(appkey, path, &apps, settings.remote_name()) {
        DispatchOutcome::NotConfigured { appkey } => Ok(format!(
            "App {} not set. Use `reporadar settings`\n",
            appkey
        )),
        DispatchOutcome::Launched { attempted, failed } if failed > 0 => Ok(format!(
            "Opened with {} of {} configured app(s)\n",
            attempted - failed,
            attempted
        )),
        DispatchOutcome::Launched { .. } => Ok(String::new()),
    }
}
