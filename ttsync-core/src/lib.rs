//! Ttsync core library — domain types, key policy, manifest parsing, errors.
//!
//! Public API surface:
//! - [`types`] — newtypes, [`RunReport`], [`RunWarning`]
//! - [`keypath`] — [`KeyPolicy`], path-segment project-key derivation
//! - [`manifest`] — `packages.config` parsing into a [`PackageVersionMap`]
//! - [`index`] — [`ReferenceIndex`], the per-run project → packages map
//! - [`error`] — [`ManifestError`]

pub mod error;
pub mod index;
pub mod keypath;
pub mod manifest;
pub mod types;

pub use error::ManifestError;
pub use index::ReferenceIndex;
pub use keypath::KeyPolicy;
pub use manifest::{parse_manifest, PackageVersionMap};
pub use types::{EmbeddedReference, ProjectKey, RunReport, RunWarning};
