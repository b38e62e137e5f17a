//! Unified diff preview for `ttsync diff`.

use std::path::{Path, PathBuf};

use similar::TextDiff;

use ttsync_core::{KeyPolicy, ReferenceIndex, RunWarning};
use ttsync_scanner::scan_tree;

use crate::error::{io_err, EngineError};
use crate::rewrite::rewrite_content;

/// A single pending rewrite, as a unified diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: PathBuf,
    pub unified_diff: String,
}

/// Diff result for a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffTreeResult {
    pub diffs: Vec<FileDiff>,
    pub warnings: Vec<RunWarning>,
}

/// Compute what [`run`](crate::pipeline::run) would rewrite and render each
/// pending change as a unified diff against the on-disk content.
///
/// No files are written.
pub fn diff_tree(root: &Path, policy: &KeyPolicy) -> Result<DiffTreeResult, EngineError> {
    let scanned = scan_tree(root)?;
    let (index, mut warnings) = ReferenceIndex::build(&scanned.manifests, policy);

    let mut diffs = Vec::new();
    for template in &scanned.templates {
        let Some(key) = policy.derive(template) else {
            continue;
        };
        let Some(packages) = index.get(&key) else {
            continue;
        };
        let existing = match std::fs::read_to_string(template) {
            Ok(text) => text,
            Err(err) => {
                warnings.push(RunWarning::TemplateFailed {
                    template: template.clone(),
                    message: io_err(template, err).to_string(),
                });
                continue;
            }
        };
        let (rewritten, changed) = rewrite_content(&existing, packages);
        if changed == 0 {
            continue;
        }

        let relative = template.strip_prefix(root).unwrap_or(template.as_path());
        let old_header = format!("a/{}", relative.display());
        let new_header = format!("b/{}", relative.display());
        let unified = TextDiff::from_lines(&existing, &rewritten)
            .unified_diff()
            .header(&old_header, &new_header)
            .context_radius(3)
            .to_string();

        diffs.push(FileDiff {
            path: template.clone(),
            unified_diff: unified,
        });
    }

    Ok(DiffTreeResult { diffs, warnings })
}
