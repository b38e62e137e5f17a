//! `ttsync diff <root>` — show unified diffs for what `run` would rewrite.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use ttsync_core::KeyPolicy;
use ttsync_engine::diff_tree;

/// Arguments for `ttsync diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Root directory of the source tree to diff.
    pub root: PathBuf,

    /// Path-segment prefix that identifies project directories.
    #[arg(long, default_value = KeyPolicy::DEFAULT_PREFIX)]
    pub project_prefix: String,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let policy = KeyPolicy::new(&self.project_prefix);
        let result = diff_tree(&self.root, &policy)
            .with_context(|| format!("diff failed under '{}'", self.root.display()))?;

        for warning in &result.warnings {
            eprintln!("{} {warning}", "warning:".yellow().bold());
        }

        if result.diffs.is_empty() {
            println!("No stale references under '{}'.", self.root.display());
            return Ok(());
        }

        for diff in result.diffs {
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }

        Ok(())
    }
}
