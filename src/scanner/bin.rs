//! reporadar-scan: background repo scanner
//!
//! Spawned detached by the main binary (or run by hand). Reads the settings
//! file, walks the configured search dirs and atomically replaces the repo
//! cache slot. All logging goes to stderr.

use std::process::ExitCode;

use clap::Parser;

/// Rescan the configured search directories and rewrite the repo cache
#[derive(Parser, Debug)]
#[command(name = "reporadar-scan")]
#[command(version)]
struct Args {
    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("reporadar={}", default_level).parse().expect("static directive")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    match reporadar::scanner::run_scan() {
        Ok(count) => {
            tracing::info!("scan complete, {} repos cached", count);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("scan failed: {}", e);
            ExitCode::from(1)
        }
    }
}
