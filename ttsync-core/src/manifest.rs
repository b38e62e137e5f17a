//! Package manifest parsing.
//!
//! A manifest (`packages.config`) is an XML document declaring zero or more
//! `package` elements, each with `id` and `version` attributes:
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <packages>
//!   <package id="Newtonsoft.Json" version="12.0.3" targetFramework="net48" />
//! </packages>
//! ```

use std::collections::HashMap;
use std::path::Path;

use crate::error::{io_err, ManifestError};

/// Mapping from package id to declared version, built once per manifest.
///
/// Package ids are case-sensitive and unique within a manifest; entry order
/// is irrelevant.
pub type PackageVersionMap = HashMap<String, String>;

/// Parse a manifest file into a [`PackageVersionMap`].
///
/// Every `package` element anywhere in the document contributes one entry.
/// A duplicate id within the same manifest is a data error in the manifest;
/// the last declaration wins and the earlier one is logged at warn level.
///
/// Returns [`ManifestError`] for unreadable files, malformed XML, or a
/// `package` element missing `id` or `version`.
pub fn parse_manifest(path: &Path) -> Result<PackageVersionMap, ManifestError> {
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let doc = roxmltree::Document::parse(&contents).map_err(|e| ManifestError::Xml {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut packages = PackageVersionMap::new();
    for node in doc
        .descendants()
        .filter(|n| n.is_element() && n.has_tag_name("package"))
    {
        let id = node
            .attribute("id")
            .ok_or_else(|| ManifestError::MissingAttribute {
                path: path.to_path_buf(),
                attribute: "id",
            })?;
        let version = node
            .attribute("version")
            .ok_or_else(|| ManifestError::MissingAttribute {
                path: path.to_path_buf(),
                attribute: "version",
            })?;
        if let Some(previous) = packages.insert(id.to_string(), version.to_string()) {
            tracing::warn!(
                "duplicate package '{id}' in {}: {previous} overridden by {version}",
                path.display(),
            );
        }
    }

    Ok(packages)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
