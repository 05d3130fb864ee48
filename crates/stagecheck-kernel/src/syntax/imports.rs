//! Import reference extraction.
//!
//! Handles the import statement shapes generated code actually uses:
//!
//! ```text
//! import { a, b as c } from './x'       Grouped, requests a, b
//! import Foo from './Foo'               Single, requests "default"
//! import * as api from './api'          Namespace, requests nothing
//! import React, { useState } from 'react'
//! import './index.css'                  SideEffect
//! ```
//!
//! Re-export references (`export { .. } from`, `export * from`) come from
//! [`ExportForm::reference`](super::ExportForm::reference).

use std::sync::LazyLock;

use regex::Regex;

use super::{line_of, pattern, split_specifier_list};

static IMPORT_FROM: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r#"\bimport\s+(?:type\s+)?([\w$\s,{}*]+?)\s*from\s*['"]([^'"]+)['"]"#)
});

static SIDE_EFFECT: LazyLock<Regex> =
    LazyLock::new(|| pattern(r#"\bimport\s*['"]([^'"]+)['"]"#));

/// Extensions treated as stylesheets.
const STYLE_EXTENSIONS: &[&str] = &[".css", ".scss", ".sass", ".less"];

/// How a module refers to another module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceKind {
    /// `import { a, b as c }`; names are source-side.
    Grouped { names: Vec<String> },
    /// `import Foo`; requests the default export.
    Single { binding: String },
    /// `import * as ns`
    Namespace { alias: String },
    /// `import './x'`
    SideEffect,
    /// `export { a, default as B } from`; names are source-side.
    Reexport { names: Vec<String> },
    /// `export * from` and `export * as ns from`
    ReexportAll,
}

/// One reference from a module file to a specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReference {
    /// The raw specifier, e.g. `./views` or `react-dom/client`.
    pub specifier: String,
    pub kind: ReferenceKind,
    /// 1-based line of the statement.
    pub line: usize,
}

impl ImportReference {
    /// Names the referencing file expects the target to export.
    pub fn requested_names(&self) -> Vec<&str> {
        match &self.kind {
            ReferenceKind::Grouped { names } | ReferenceKind::Reexport { names } => {
                names.iter().map(String::as_str).collect()
            }
            ReferenceKind::Single { .. } => vec!["default"],
            ReferenceKind::Namespace { .. } | ReferenceKind::SideEffect | ReferenceKind::ReexportAll => {
                Vec::new()
            }
        }
    }

    pub fn is_relative(&self) -> bool {
        is_relative_specifier(&self.specifier)
    }

    pub fn is_style(&self) -> bool {
        is_style_specifier(&self.specifier)
    }
}

/// `./x`, `../x`, `.` or `..`
pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

pub fn is_style_specifier(specifier: &str) -> bool {
    STYLE_EXTENSIONS.iter().any(|ext| specifier.ends_with(ext))
}

/// Extract import references from comment-stripped module text, in source
/// order.
pub fn extract_imports(text: &str) -> Vec<ImportReference> {
    let mut refs: Vec<(usize, ImportReference)> = Vec::new();

    for caps in IMPORT_FROM.captures_iter(text) {
        let (Some(whole), Some(clause), Some(spec)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let line = line_of(text, whole.start());
        for kind in parse_clause(clause.as_str()) {
            refs.push((
                whole.start(),
                ImportReference {
                    specifier: spec.as_str().to_string(),
                    kind,
                    line,
                },
            ));
        }
    }

    for caps in SIDE_EFFECT.captures_iter(text) {
        let (Some(whole), Some(spec)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        refs.push((
            whole.start(),
            ImportReference {
                specifier: spec.as_str().to_string(),
                kind: ReferenceKind::SideEffect,
                line: line_of(text, whole.start()),
            },
        ));
    }

    refs.sort_by_key(|(offset, _)| *offset);
    refs.into_iter().map(|(_, r)| r).collect()
}

/// Split an import clause into its reference kinds.
fn parse_clause(clause: &str) -> Vec<ReferenceKind> {
    let (outside, grouped) = match (clause.find('{'), clause.find('}')) {
        (Some(open), Some(close)) if open < close => (
            format!("{} {}", &clause[..open], &clause[close + 1..]),
            Some(&clause[open + 1..close]),
        ),
        _ => (clause.to_string(), None),
    };

    let mut kinds = Vec::new();
    for part in outside.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        if let Some(rest) = part.strip_prefix('*') {
            if let Some(alias) = rest.trim_start().strip_prefix("as") {
                kinds.push(ReferenceKind::Namespace {
                    alias: alias.trim().to_string(),
                });
            }
        } else if is_identifier(part) {
            kinds.push(ReferenceKind::Single {
                binding: part.to_string(),
            });
        }
    }
    if let Some(body) = grouped {
        kinds.push(ReferenceKind::Grouped {
            names: split_specifier_list(body)
                .into_iter()
                .map(|(source, _)| source)
                .collect(),
        });
    }
    kinds
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_grouped_requests_source_names() {
        let refs = extract_imports("import { a, b as c, type D } from './x';");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].requested_names(), vec!["a", "b", "D"]);
        assert_eq!(refs[0].specifier, "./x");
    }

    #[test]
    fn test_single_requests_default() {
        let refs = extract_imports("import Home from './views/Home';");
        assert_eq!(
            refs[0].kind,
            ReferenceKind::Single {
                binding: "Home".into()
            }
        );
        assert_eq!(refs[0].requested_names(), vec!["default"]);
    }

    #[test]
    fn test_combined_clause() {
        let refs = extract_imports("import React, { useState } from 'react';");
        let kinds: Vec<_> = refs.iter().map(|r| r.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                ReferenceKind::Single {
                    binding: "React".into()
                },
                ReferenceKind::Grouped {
                    names: vec!["useState".into()]
                },
            ]
        );
    }

    #[test]
    fn test_namespace_and_side_effect() {
        let text = "import * as api from './api';\nimport './index.css';";
        let refs = extract_imports(text);
        assert_eq!(
            refs[0].kind,
            ReferenceKind::Namespace {
                alias: "api".into()
            }
        );
        assert!(refs[0].requested_names().is_empty());
        assert_eq!(refs[1].kind, ReferenceKind::SideEffect);
        assert_eq!(refs[1].line, 2);
        assert!(refs[1].is_style());
    }

    #[test]
    fn test_multiline_grouped_import() {
        let text = "import {\n  BrowserRouter,\n  Routes,\n} from 'react-router-dom';";
        let refs = extract_imports(text);
        assert_eq!(refs[0].requested_names(), vec!["BrowserRouter", "Routes"]);
        assert_eq!(refs[0].line, 1);
    }

    #[test]
    fn test_type_import() {
        let refs = extract_imports("import type { User } from '../types';");
        assert_eq!(refs[0].requested_names(), vec!["User"]);
    }

    #[test]
    fn test_dynamic_import_and_meta_ignored() {
        let text = "const x = import.meta.env.VITE_API_BASE_URL;\nconst V = lazy(() => import('./V'));";
        assert!(extract_imports(text).is_empty());
    }

    #[rstest]
    #[case("./App", true)]
    #[case("../context", true)]
    #[case(".", true)]
    #[case("react", false)]
    #[case("@types/react", false)]
    #[case(".hidden", false)]
    fn test_relative_specifier(#[case] spec: &str, #[case] expected: bool) {
        assert_eq!(is_relative_specifier(spec), expected);
    }
}
