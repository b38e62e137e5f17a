//! `ttsync run` — rewrite stale assembly references in place.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use ttsync_core::{KeyPolicy, RunReport};
use ttsync_engine::pipeline::{self, RunOptions};

/// Arguments for `ttsync run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Root directory of the source tree to synchronize.
    pub root: PathBuf,

    /// Show what would be rewritten without actually writing any files.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit the run report as machine-readable JSON.
    #[arg(long)]
    pub json: bool,

    /// Path-segment prefix that identifies project directories.
    #[arg(long, default_value = KeyPolicy::DEFAULT_PREFIX)]
    pub project_prefix: String,
}

impl RunArgs {
    pub fn run(self) -> Result<()> {
        let options = RunOptions {
            key_policy: KeyPolicy::new(&self.project_prefix),
            dry_run: self.dry_run,
        };
        let report = pipeline::run(&self.root, &options)
            .with_context(|| format!("sync failed under '{}'", self.root.display()))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize run report")?,
            );
            return Ok(());
        }

        print_report(&report);
        Ok(())
    }
}

fn print_report(report: &RunReport) {
    for warning in &report.warnings {
        eprintln!("{} {warning}", "warning:".yellow().bold());
    }

    let prefix = if report.dry_run { "[dry-run] " } else { "" };
    if report.files_changed == 0 {
        println!(
            "{prefix}✓ all {} template(s) up to date ({} ms)",
            report.templates_seen, report.elapsed_ms,
        );
        return;
    }

    println!(
        "{prefix}✓ {} reference(s) updated in {} file(s) ({} ms)",
        report.references_changed, report.files_changed, report.elapsed_ms,
    );
    let glyph = if report.dry_run { "~" } else { "✎" };
    for path in &report.changed_files {
        println!("  {glyph}  {}", path.display());
    }
}
