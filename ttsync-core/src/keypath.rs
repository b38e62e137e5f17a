//! Project-key derivation from file paths.
//!
//! Templates and manifests are associated by an identifier recovered from
//! their paths: the first path segment whose text starts with a fixed prefix
//! token. The token is injectable so the matching rule can be tested and
//! swapped without touching the synchronizer.

use std::path::{Component, Path};

use crate::types::ProjectKey;

/// Derives a [`ProjectKey`] from a path by prefix-matching its segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPolicy {
    prefix: String,
}

impl KeyPolicy {
    /// The conventional project-directory prefix.
    pub const DEFAULT_PREFIX: &'static str = "BDB";

    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Return the first path segment starting with the prefix token, or
    /// `None` when no segment matches.
    ///
    /// Only normal components are considered; root and `..`/`.` segments can
    /// never contribute a key. An empty prefix never matches.
    pub fn derive(&self, path: &Path) -> Option<ProjectKey> {
        if self.prefix.is_empty() {
            return None;
        }
        path.components().find_map(|component| match component {
            Component::Normal(segment) => segment
                .to_str()
                .filter(|s| s.starts_with(&self.prefix))
                .map(ProjectKey::from),
            _ => None,
        })
    }
}

impl Default for KeyPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PREFIX)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
