//! Assembly directive recognition.
//!
//! A directive line references an assembly under the solution directory:
//!
//! ```text
//! <#@ assembly Name="$(SolutionDir)packages\Foo.Client.1.2.3.4\lib\net48\Foo.Client.dll" #>
//! ```
//!
//! The embedded fragment `\Foo.Client.1.2.3.4\` carries the package token and
//! a four-part dotted version, both delimited by backslashes. Matching is
//! single-pass, leftmost-first: a line with several candidate fragments only
//! ever yields the first.

use std::sync::LazyLock;

use regex::Regex;

use ttsync_core::EmbeddedReference;

/// Literal marker a directive line starts with, after leading whitespace.
pub const DIRECTIVE_PREFIX: &str = r#"<#@ assembly Name="$(SolutionDir)"#;

/// `\<name-chars><w.x.y.z>\` — a backslash-delimited path segment ending in a
/// four-part dotted numeric version. The name class includes digits and dots,
/// so the name group is non-greedy: the version starts at the earliest point
/// that leaves exactly four dotted runs before the closing backslash.
static FRAGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\([A-Za-z0-9.]*?)(\d+\.\d+\.\d+\.\d+)\\").expect("invalid fragment regex")
});

/// Parse one line of a template file.
///
/// Returns the embedded `(package, version)` pair, or `None` when the line is
/// not a directive or the directive carries no version-shaped fragment. The
/// package token keeps its trailing `.` separator; lookup sites trim it.
pub fn parse_directive(line: &str) -> Option<EmbeddedReference> {
    if !line.trim_start().starts_with(DIRECTIVE_PREFIX) {
        return None;
    }
    let captures = FRAGMENT_RE.captures(line)?;
    Some(EmbeddedReference {
        package: captures[1].to_string(),
        version: captures[2].to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
