//! Export form extraction.

use std::sync::LazyLock;

use regex::Regex;

use super::imports::{ImportReference, ReferenceKind};
use super::{line_of, pattern, split_specifier_list};

static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    pattern(
        r"\bexport\s+(?:declare\s+)?(?:async\s+)?(?:abstract\s+)?(?:(?:const\s+enum|interface|type|const|let|var|class|enum)\s+|function\b\s*\*?\s*)([A-Za-z_$][\w$]*)",
    )
});

static LIST: LazyLock<Regex> = LazyLock::new(|| {
    pattern(
        r#"\bexport\s*(?:type\s*)?\{([^}]*)\}(?:\s*from\s*['"]([^'"]+)['"])?"#,
    )
});

static NAMESPACE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(
        r#"\bexport\s+\*\s+as\s+([A-Za-z_$][\w$]*)\s+from\s*['"]([^'"]+)['"]"#,
    )
});

static WILDCARD: LazyLock<Regex> = LazyLock::new(|| {
    pattern(
        r#"\bexport\s+\*\s*from\s*['"]([^'"]+)['"]"#,
    )
});

static DEFAULT: LazyLock<Regex> = LazyLock::new(|| pattern(r"\bexport\s+default\b"));

/// One `name` or `name as alias` item of an export list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// Name on the source side (local binding, or the source module's name).
    pub local: String,
    /// Name other modules see.
    pub exported: String,
}

/// A single export statement, tagged by form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportForm {
    /// `export const Foo`, `export function Foo`, `export interface Foo`, ...
    Declaration { name: String, line: usize },
    /// `export { a, b as c }`, optionally `from '<source>'`.
    List {
        entries: Vec<ListEntry>,
        source: Option<String>,
        line: usize,
    },
    /// `export * as ns from '<source>'`
    NamespaceReexport {
        name: String,
        source: String,
        line: usize,
    },
    /// `export * from '<source>'`
    Wildcard { source: String, line: usize },
    /// `export default ...`
    Default { line: usize },
}

impl ExportForm {
    /// Names this form adds to the file's export set.
    ///
    /// A wildcard contributes the `"*"` sentinel; the names behind it are
    /// only known after resolution.
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::Declaration { name, .. } | Self::NamespaceReexport { name, .. } => {
                vec![name.as_str()]
            }
            Self::List { entries, .. } => entries.iter().map(|e| e.exported.as_str()).collect(),
            Self::Wildcard { .. } => vec!["*"],
            Self::Default { .. } => vec!["default"],
        }
    }

    /// The reference a re-export makes from this file to its source.
    pub fn reference(&self) -> Option<ImportReference> {
        match self {
            Self::List {
                entries,
                source: Some(source),
                line,
            } => Some(ImportReference {
                specifier: source.clone(),
                kind: ReferenceKind::Reexport {
                    names: entries.iter().map(|e| e.local.clone()).collect(),
                },
                line: *line,
            }),
            Self::NamespaceReexport { source, line, .. } | Self::Wildcard { source, line } => {
                Some(ImportReference {
                    specifier: source.clone(),
                    kind: ReferenceKind::ReexportAll,
                    line: *line,
                })
            }
            _ => None,
        }
    }
}

/// Extract all export forms from comment-stripped module text, in source
/// order.
pub fn extract_exports(text: &str) -> Vec<ExportForm> {
    let mut forms: Vec<(usize, ExportForm)> = Vec::new();

    for caps in DECLARATION.captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        forms.push((
            whole.start(),
            ExportForm::Declaration {
                name: name.as_str().to_string(),
                line: line_of(text, whole.start()),
            },
        ));
    }

    for caps in LIST.captures_iter(text) {
        let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let entries = split_specifier_list(body.as_str())
            .into_iter()
            .map(|(local, exported)| ListEntry { local, exported })
            .collect();
        forms.push((
            whole.start(),
            ExportForm::List {
                entries,
                source: caps.get(2).map(|m| m.as_str().to_string()),
                line: line_of(text, whole.start()),
            },
        ));
    }

    for caps in NAMESPACE.captures_iter(text) {
        let (Some(whole), Some(name), Some(source)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        forms.push((
            whole.start(),
            ExportForm::NamespaceReexport {
                name: name.as_str().to_string(),
                source: source.as_str().to_string(),
                line: line_of(text, whole.start()),
            },
        ));
    }

    for caps in WILDCARD.captures_iter(text) {
        let (Some(whole), Some(source)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        forms.push((
            whole.start(),
            ExportForm::Wildcard {
                source: source.as_str().to_string(),
                line: line_of(text, whole.start()),
            },
        ));
    }

    for m in DEFAULT.find_iter(text) {
        forms.push((
            m.start(),
            ExportForm::Default {
                line: line_of(text, m.start()),
            },
        ));
    }

    forms.sort_by_key(|(offset, _)| *offset);
    forms.into_iter().map(|(_, form)| form).collect()
}
