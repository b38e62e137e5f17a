//! `ttsync scan` — discovery inspection without touching anything.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use ttsync_core::{KeyPolicy, ReferenceIndex, RunWarning};
use ttsync_scanner::scan_tree;

/// Arguments for `ttsync scan`.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Root directory of the source tree to inspect.
    pub root: PathBuf,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,

    /// Path-segment prefix that identifies project directories.
    #[arg(long, default_value = KeyPolicy::DEFAULT_PREFIX)]
    pub project_prefix: String,
}

#[derive(Debug, Clone)]
struct ProjectRow {
    project: String,
    manifest: PathBuf,
    packages: usize,
    templates: usize,
}

#[derive(Serialize)]
struct ScanReportJson {
    root: PathBuf,
    projects: Vec<ProjectRowJson>,
    unkeyed_templates: usize,
    warnings: Vec<RunWarning>,
}

#[derive(Serialize)]
struct ProjectRowJson {
    project: String,
    manifest: PathBuf,
    packages: usize,
    templates: usize,
}

#[derive(Tabled)]
struct ScanTableRow {
    #[tabled(rename = "project")]
    project: String,
    #[tabled(rename = "manifest")]
    manifest: String,
    #[tabled(rename = "packages")]
    packages: usize,
    #[tabled(rename = "templates")]
    templates: usize,
}

impl ScanArgs {
    pub fn run(self) -> Result<()> {
        let policy = KeyPolicy::new(&self.project_prefix);
        let scanned = scan_tree(&self.root)
            .with_context(|| format!("scan failed under '{}'", self.root.display()))?;
        let (index, warnings) = ReferenceIndex::build(&scanned.manifests, &policy);

        let mut template_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut unkeyed_templates = 0;
        for template in &scanned.templates {
            match policy.derive(template) {
                Some(key) => *template_counts.entry(key.0).or_default() += 1,
                None => unkeyed_templates += 1,
            }
        }

        // One row per keyed manifest, sorted by project for stable output.
        let mut rows: BTreeMap<String, ProjectRow> = BTreeMap::new();
        for manifest in &scanned.manifests {
            let Some(key) = policy.derive(manifest) else {
                continue;
            };
            let packages = index.get(&key).map(|map| map.len()).unwrap_or(0);
            let templates = template_counts.get(&key.0).copied().unwrap_or(0);
            rows.insert(
                key.0.clone(),
                ProjectRow {
                    project: key.0,
                    manifest: manifest.clone(),
                    packages,
                    templates,
                },
            );
        }
        let rows: Vec<ProjectRow> = rows.into_values().collect();

        if self.json {
            let payload = ScanReportJson {
                root: self.root.clone(),
                projects: rows
                    .into_iter()
                    .map(|row| ProjectRowJson {
                        project: row.project,
                        manifest: row.manifest,
                        packages: row.packages,
                        templates: row.templates,
                    })
                    .collect(),
                unkeyed_templates,
                warnings,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).context("failed to serialize scan report")?,
            );
            return Ok(());
        }

        for warning in &warnings {
            eprintln!("{} {warning}", "warning:".yellow().bold());
        }

        println!(
            "ttsync v{} | {} project(s) | {} manifest(s) | {} template(s)",
            env!("CARGO_PKG_VERSION"),
            index.len(),
            scanned.manifests.len(),
            scanned.templates.len(),
        );

        if rows.is_empty() {
            println!("No '{}'-prefixed projects found.", policy.prefix());
            return Ok(());
        }

        let table_rows: Vec<ScanTableRow> = rows
            .into_iter()
            .map(|row| ScanTableRow {
                project: row.project,
                manifest: row.manifest.display().to_string(),
                packages: row.packages,
                templates: row.templates,
            })
            .collect();
        let mut table = Table::new(table_rows);
        table.with(Style::rounded());
        println!("{table}");

        if unkeyed_templates > 0 {
            println!("{unkeyed_templates} template(s) belong to no project and will never be rewritten.");
        }

        Ok(())
    }
}
