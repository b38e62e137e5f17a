//! Ttsync — keep template assembly references in step with package manifests.
//!
//! # Usage
//!
//! ```text
//! ttsync run <root> [--dry-run] [--json] [--project-prefix <TOKEN>]
//! ttsync diff <root> [--project-prefix <TOKEN>]
//! ttsync scan <root> [--json] [--project-prefix <TOKEN>]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{diff::DiffArgs, run::RunArgs, scan::ScanArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "ttsync",
    version,
    about = "Synchronize template assembly references with packages.config versions",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rewrite stale assembly references under a source tree.
    Run(RunArgs),

    /// Show unified diffs of what `run` would rewrite.
    Diff(DiffArgs),

    /// List discovered projects, manifests, and templates.
    Scan(ScanArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => args.run(),
        Commands::Diff(args) => args.run(),
        Commands::Scan(args) => args.run(),
    }
}
