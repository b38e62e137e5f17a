//! Run pipeline — scan, index, synchronize, aggregate.
//!
//! This is the canonical entrypoint for `ttsync run`. Each run is stateless:
//! the reference index and the report live only for the duration of the call.

use std::path::Path;
use std::time::Instant;

use chrono::Utc;

use ttsync_core::{KeyPolicy, ReferenceIndex, RunReport, RunWarning};
use ttsync_scanner::scan_tree;

use crate::error::EngineError;
use crate::rewrite::{sync_template, TemplateOutcome};

/// Per-run configuration.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// How project keys are derived from paths.
    pub key_policy: KeyPolicy,
    /// Report what would change without writing anything.
    pub dry_run: bool,
}

/// Run the synchronizer over every template under `root`.
///
/// Fails only on scan errors; everything else is folded into the report as
/// warnings. Each template is processed exactly once, in scan order — no
/// template's outcome depends on any other's.
pub fn run(root: &Path, options: &RunOptions) -> Result<RunReport, EngineError> {
    let started_at = Utc::now();
    let clock = Instant::now();

    tracing::info!("scanning {}", root.display());
    let scanned = scan_tree(root)?;

    tracing::info!("parsing {} manifest file(s)", scanned.manifests.len());
    let (index, mut warnings) = ReferenceIndex::build(&scanned.manifests, &options.key_policy);

    tracing::info!(
        "processing {} template file(s) against {} project(s)",
        scanned.templates.len(),
        index.len(),
    );
    let mut files_changed = 0;
    let mut references_changed = 0;
    let mut changed_files = Vec::new();
    for template in &scanned.templates {
        match sync_template(template, &index, &options.key_policy, options.dry_run) {
            Ok(TemplateOutcome::Rewritten { path, references })
            | Ok(TemplateOutcome::WouldRewrite { path, references }) => {
                files_changed += 1;
                references_changed += references;
                changed_files.push(path);
            }
            Ok(TemplateOutcome::Unchanged { .. }) | Ok(TemplateOutcome::Skipped { .. }) => {}
            Err(err) => {
                tracing::warn!("failed to process {}: {err}", template.display());
                warnings.push(RunWarning::TemplateFailed {
                    template: template.clone(),
                    message: err.to_string(),
                });
            }
        }
    }

    Ok(RunReport {
        started_at,
        elapsed_ms: clock.elapsed().as_millis() as u64,
        dry_run: options.dry_run,
        templates_seen: scanned.templates.len(),
        files_changed,
        references_changed,
        changed_files,
        warnings,
    })
}
