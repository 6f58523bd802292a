//! reporadar CLI entry point
//!
//! Always exits 0: the launcher UI has no channel for failure display, so
//! anything that escapes a handler is converted into an informational item
//! (for `search`) or a printed hint.

use std::process::ExitCode;

use clap::Parser;

use reporadar::cli::{Cli, Commands};
use reporadar::commands::{self, CommandContext};
use reporadar::feedback::{Feedback, Item, ICON_WARNING};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = CommandContext::from_env(cli.update_every_mins);

    let result = match &cli.command {
        Commands::Search { query } => {
            commands::run_search(query.as_deref().unwrap_or("").trim(), &ctx)
        }
        Commands::Settings => commands::run_settings(&ctx),
        Commands::Update => commands::run_update(&ctx),
        Commands::Open { appkey, path } => commands::run_open(appkey, path, &ctx),
    };

    match result {
        Ok(output) => print!("{}", output),
        Err(e) => {
            tracing::error!("{}", e);
            match &cli.command {
                Commands::Search { .. } => {
                    let mut feedback = Feedback::new();
                    feedback.items.push(
                        Item::new("Something went wrong")
                            .subtitle(e.to_string())
                            .icon(ICON_WARNING),
                    );
                    print!("{}", feedback.to_json());
                }
                _ => println!("Error: {}", e),
            }
        }
    }

    ExitCode::SUCCESS
}

/// Logging goes to stderr; stdout belongs to the launcher payload
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                format!("reporadar={}", default_level)
                    .parse()
                    .expect("static directive"),
            ),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
