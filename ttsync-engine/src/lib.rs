//! # ttsync-engine
//!
//! Directive matching, template rewriting, and run orchestration.
//!
//! Call [`pipeline::run`] to synchronize every template under a root against
//! its owning project's manifest, or [`diff::diff_tree`] to preview the same
//! rewrites as unified diffs without writing.

pub mod diff;
pub mod directive;
pub mod error;
pub mod pipeline;
pub mod rewrite;

pub use diff::{diff_tree, DiffTreeResult, FileDiff};
pub use directive::{parse_directive, DIRECTIVE_PREFIX};
pub use error::EngineError;
pub use pipeline::{run, RunOptions};
pub use rewrite::{rewrite_content, sync_template, SkipReason, TemplateOutcome};
