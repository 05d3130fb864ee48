//! Lightweight syntax extraction for module files.
//!
//! This is not a parser. Each module file is comment-stripped by [`lexer`]
//! and then matched against a small set of patterns:
//!
//! - [`exports`] finds the export forms a file declares.
//! - [`imports`] finds the references a file makes to other modules.
//!
//! Both produce tagged variants so the symbol table and the rules can match
//! on the form rather than re-inspect text.

pub mod exports;
pub mod imports;
pub mod lexer;

pub use exports::{ExportForm, ListEntry, extract_exports};
pub use imports::{ImportReference, ReferenceKind, extract_imports};
pub use lexer::strip_comments;

use regex::Regex;

/// Compile a pattern written as a literal in this crate.
#[allow(clippy::expect_used)]
pub(crate) fn pattern(src: &str) -> Regex {
    Regex::new(src).expect("literal pattern compiles")
}

/// 1-based line number of a byte offset.
pub(crate) fn line_of(text: &str, offset: usize) -> usize {
    text.get(..offset)
        .map_or(0, |prefix| prefix.bytes().filter(|b| *b == b'\n').count())
        + 1
}

/// Split a `{ a, b as c, type d }` body into `(source, visible)` pairs.
///
/// A leading `type` modifier is dropped. Empty items (trailing commas) are
/// skipped.
pub(crate) fn split_specifier_list(body: &str) -> Vec<(String, String)> {
    body.split(',')
        .filter_map(|item| {
            let item = item.trim();
            let item = item
                .strip_prefix("type ")
                .map(str::trim_start)
                .unwrap_or(item);
            if item.is_empty() {
                return None;
            }
            let mut parts = item.split_whitespace();
            let source = parts.next()?.to_string();
            let visible = match (parts.next(), parts.next()) {
                (Some("as"), Some(alias)) => alias.to_string(),
                _ => source.clone(),
            };
            Some((source, visible))
        })
        .collect()
}
