//! Settings command handler: open the settings file in its default editor

use std::process::Command;

use crate::commands::CommandContext;
use crate::error::{RepoError, Result};
use crate::settings::Settings;

/// Run the settings command
pub fn run_settings(ctx: &CommandContext) -> Result<String> {
    // Make sure there is a file to edit before handing it to the editor
    Settings::load_or_create(&ctx.settings_path)?;

    let status = Command::new("open")
        .arg(&ctx.settings_path)
        .status()
        .map_err(|e| RepoError::Launch {
            what: "settings editor".to_string(),
            message: e.to_string(),
        })?;

    if !status.success() {
        return Err(RepoError::Launch {
            what: "settings editor".to_string(),
            message: format!("open exited with {}", status),
        });
    }

    Ok(format!("Opened {}\n", ctx.settings_path.display()))
}
