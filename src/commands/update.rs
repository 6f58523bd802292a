//! Update command handler: trigger the background scanner unconditionally

use crate::background::{scan_command, StartOutcome, SCAN_TASK};
use crate::commands::CommandContext;
use crate::error::Result;

/// Run the update command
pub fn run_update(ctx: &CommandContext) -> Result<String> {
    match ctx.registry.start_if_absent(SCAN_TASK, &mut scan_command())? {
        StartOutcome::Started(pid) => Ok(format!(
            "Scanning for repos in the background (pid {})\n",
            pid
        )),
        StartOutcome::AlreadyRunning(pid) => {
            Ok(format!("A repo scan is already running (pid {})\n", pid))
        }
    }
}
