//! Reference index — project key → package version map.
//!
//! Built once per run from the discovered manifests, then read-only for the
//! rest of the run. Every failure while folding a manifest is soft: the
//! offending manifest is skipped, a [`RunWarning`] is recorded, and the
//! remaining manifests are still indexed.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::keypath::KeyPolicy;
use crate::manifest::{parse_manifest, PackageVersionMap};
use crate::types::{ProjectKey, RunWarning};

/// Read-only mapping from [`ProjectKey`] to that project's declared packages.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    by_project: HashMap<ProjectKey, PackageVersionMap>,
}

impl ReferenceIndex {
    /// Fold the given manifest files into an index.
    ///
    /// At most one manifest contributes per project key. When two manifests
    /// resolve to the same key the later one wins outright, and the collision
    /// is reported as a warning rather than resolved silently.
    pub fn build(manifests: &[PathBuf], policy: &KeyPolicy) -> (Self, Vec<RunWarning>) {
        let mut by_project = HashMap::new();
        let mut sources: HashMap<ProjectKey, PathBuf> = HashMap::new();
        let mut warnings = Vec::new();

        for manifest in manifests {
            let Some(key) = policy.derive(manifest) else {
                tracing::warn!(
                    "no '{}'-prefixed segment in {}; manifest not indexed",
                    policy.prefix(),
                    manifest.display(),
                );
                warnings.push(RunWarning::ManifestUnkeyed {
                    manifest: manifest.clone(),
                });
                continue;
            };

            let packages = match parse_manifest(manifest) {
                Ok(packages) => packages,
                Err(err) => {
                    tracing::warn!("skipping manifest {}: {err}", manifest.display());
                    warnings.push(RunWarning::ManifestUnparsed {
                        manifest: manifest.clone(),
                        message: err.to_string(),
                    });
                    continue;
                }
            };

            if let Some(earlier) = sources.insert(key.clone(), manifest.clone()) {
                tracing::warn!(
                    "project '{key}' declared by both {} and {}; keeping the latter",
                    earlier.display(),
                    manifest.display(),
                );
                warnings.push(RunWarning::ManifestCollision {
                    key: key.clone(),
                    earlier,
                    later: manifest.clone(),
                });
            }
            by_project.insert(key, packages);
        }

        (Self { by_project }, warnings)
    }

    /// Look up the package map for a project key.
    pub fn get(&self, key: &ProjectKey) -> Option<&PackageVersionMap> {
        self.by_project.get(key)
    }

    /// Project keys present in the index, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &ProjectKey> {
        self.by_project.keys()
    }

    pub fn len(&self) -> usize {
        self.by_project.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_project.is_empty()
    }
}

/// Derive the owning project key for a template file.
///
/// Same rule as manifests; kept as a named helper so both sides of the
/// association visibly use one policy.
pub fn owning_key(template: &Path, policy: &KeyPolicy) -> Option<ProjectKey> {
    policy.derive(template)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
