//! Per-template synchronization and atomic rewrite.
//!
//! ## Rewrite protocol
//!
//! 1. Resolve the template's project key; bail out (untouched) if the key is
//!    absent or not indexed.
//! 2. Read the file and rewrite stale directive lines in memory.
//! 3. If nothing changed, stop — the file is never opened for writing, so
//!    no-op runs leave modification times alone.
//! 4. Write the full new content to `<path>.ttsync.tmp`.
//! 5. Rename to the final path (atomic on POSIX); remove the tmp file if the
//!    rename fails. A file is either fully rewritten or not written at all.

use std::path::{Path, PathBuf};

use ttsync_core::{KeyPolicy, PackageVersionMap, ProjectKey, ReferenceIndex};

use crate::directive::parse_directive;
use crate::error::{io_err, EngineError};

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Why a template was left untouched without even reading it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No path segment yields a project key.
    NoProjectKey,
    /// The key exists but no manifest contributed a map for it.
    KeyNotIndexed(ProjectKey),
}

/// Outcome of synchronizing a single template file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateOutcome {
    /// Stale references were rewritten and the file was saved.
    Rewritten { path: PathBuf, references: usize },
    /// Dry-run mode: the file *would* have been rewritten.
    WouldRewrite { path: PathBuf, references: usize },
    /// Every directive already matches its manifest (or none parse).
    Unchanged { path: PathBuf },
    /// No references could be validated for this file.
    Skipped { path: PathBuf, reason: SkipReason },
}

// ---------------------------------------------------------------------------
// Pure rewrite
// ---------------------------------------------------------------------------

/// Rewrite stale directive lines in `text` against `packages`.
///
/// Returns the new text and the number of lines changed. Non-directive lines,
/// directives without a parsable fragment, references to undeclared packages,
/// and up-to-date references all pass through byte-for-byte. Each line keeps
/// its own terminator (`\n` or `\r\n`); a missing final terminator stays
/// missing.
///
/// Only the *first* occurrence of the stale version substring on a line is
/// substituted, even if the same text appears again later on that line.
pub fn rewrite_content(text: &str, packages: &PackageVersionMap) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    let mut changed = 0;

    for chunk in text.split_inclusive('\n') {
        let (line, terminator) = split_terminator(chunk);
        match stale_reference(line, packages) {
            Some((old_version, new_version)) => {
                out.push_str(&line.replacen(&old_version, new_version, 1));
                changed += 1;
            }
            None => out.push_str(line),
        }
        out.push_str(terminator);
    }

    (out, changed)
}

/// `Some((embedded version, manifest version))` when `line` is a directive
/// whose version disagrees with the owning project's manifest.
fn stale_reference<'a>(line: &str, packages: &'a PackageVersionMap) -> Option<(String, &'a str)> {
    let reference = parse_directive(line)?;
    let package = reference.package.trim_end_matches('.');
    let Some(declared) = packages.get(package) else {
        tracing::warn!(
            "assembly references package '{package}', which the manifest does not declare"
        );
        return None;
    };
    if declared.is_empty() || *declared == reference.version {
        return None;
    }
    Some((reference.version, declared.as_str()))
}

fn split_terminator(chunk: &str) -> (&str, &str) {
    if let Some(line) = chunk.strip_suffix("\r\n") {
        (line, "\r\n")
    } else if let Some(line) = chunk.strip_suffix('\n') {
        (line, "\n")
    } else {
        (chunk, "")
    }
}

// ---------------------------------------------------------------------------
// sync_template
// ---------------------------------------------------------------------------

/// Synchronize one template file against the reference index.
///
/// Errors are per-file: the caller decides whether to abort or to record a
/// warning and continue (the run aggregator does the latter).
pub fn sync_template(
    path: &Path,
    index: &ReferenceIndex,
    policy: &KeyPolicy,
    dry_run: bool,
) -> Result<TemplateOutcome, EngineError> {
    let Some(key) = policy.derive(path) else {
        tracing::debug!("no project key: {}", path.display());
        return Ok(TemplateOutcome::Skipped {
            path: path.to_path_buf(),
            reason: SkipReason::NoProjectKey,
        });
    };
    let Some(packages) = index.get(&key) else {
        tracing::debug!("project '{key}' has no indexed manifest: {}", path.display());
        return Ok(TemplateOutcome::Skipped {
            path: path.to_path_buf(),
            reason: SkipReason::KeyNotIndexed(key),
        });
    };

    let text = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let (rewritten, references) = rewrite_content(&text, packages);
    if references == 0 {
        tracing::debug!("unchanged: {}", path.display());
        return Ok(TemplateOutcome::Unchanged {
            path: path.to_path_buf(),
        });
    }

    if dry_run {
        tracing::info!("[dry-run] would rewrite: {}", path.display());
        return Ok(TemplateOutcome::WouldRewrite {
            path: path.to_path_buf(),
            references,
        });
    }

    let tmp = PathBuf::from(format!("{}.ttsync.tmp", path.display()));
    std::fs::write(&tmp, &rewritten).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }

    tracing::info!("rewrote {references} reference(s) in {}", path.display());
    Ok(TemplateOutcome::Rewritten {
        path: path.to_path_buf(),
        references,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
