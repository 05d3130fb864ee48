//! Module resolution.
//!
//! Maps `(referencing file, specifier)` to a [`Resolution`]. Relative
//! specifiers are resolved lexically against the referencing file's directory
//! and looked up in the scanned tree only; the filesystem is never
//! consulted. Bare specifiers are checked against the package manifest.
//!
//! Probe order for a relative specifier `./x`:
//!
//! ```text
//! x, x.ts, x.tsx, x.js, x.jsx, x/index.ts, x/index.tsx
//! ```
//!
//! The first scanned file that matches wins.

use std::collections::BTreeMap;

use crate::manifest::PackageManifest;
use crate::scanner::SourceTree;
use crate::symbols::SymbolTable;
use crate::syntax::imports::{is_relative_specifier, is_style_specifier};

/// Suffixes appended to a normalized relative path, in lookup order.
pub const PROBE_SUFFIXES: &[&str] = &["", ".ts", ".tsx", ".js", ".jsx", "/index.ts", "/index.tsx"];

/// Node built-in modules. Build configuration imports them without
/// declaring them.
pub const NODE_BUILTINS: &[&str] = &[
    "assert", "async_hooks", "buffer", "child_process", "cluster", "console", "constants",
    "crypto", "dgram", "diagnostics_channel", "dns", "domain", "events", "fs", "http", "http2",
    "https", "inspector", "module", "net", "os", "path", "perf_hooks", "process", "punycode",
    "querystring", "readline", "repl", "stream", "string_decoder", "sys", "timers", "tls",
    "trace_events", "tty", "url", "util", "v8", "vm", "wasi", "worker_threads", "zlib",
];

/// Outcome of resolving one specifier from one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A scanned file, by relative path.
    File(String),
    /// A bare package present in the manifest.
    Package(String),
    /// A relative specifier no scanned file matches.
    UnresolvedRelative,
    /// A bare package missing from the manifest (or no manifest).
    UnresolvedPackage(String),
    /// A relative stylesheet; not checked.
    Style,
    /// URL scheme, absolute path or Node built-in; not checked.
    Unsupported,
}

impl Resolution {
    pub fn file(&self) -> Option<&str> {
        match self {
            Self::File(path) => Some(path),
            _ => None,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::UnresolvedRelative | Self::UnresolvedPackage(_))
    }
}

/// Lexically join `specifier` onto `base_dir`.
///
/// Returns `None` when the result would escape the artifact root.
pub fn normalize(base_dir: &str, specifier: &str) -> Option<String> {
    let mut parts: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in specifier.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    Some(parts.join("/"))
}

/// Package identifier of a bare specifier.
///
/// `@scope/name/sub` gives `@scope/name`; `react-dom/client` gives
/// `react-dom`.
pub fn package_name(specifier: &str) -> Option<String> {
    let mut segments = specifier.split('/');
    let first = segments.next().filter(|s| !s.is_empty())?;
    if first.starts_with('@') {
        match segments.next().filter(|s| !s.is_empty()) {
            Some(name) => Some(format!("{first}/{name}")),
            None => Some(first.to_string()),
        }
    } else {
        Some(first.to_string())
    }
}

/// `node:fs`, `virtual:pwa`, `https://cdn/...`
fn has_scheme(specifier: &str) -> bool {
    specifier.split_once(':').is_some_and(|(scheme, _)| {
        !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// Resolves specifiers against one scanned tree and its manifest.
#[derive(Debug, Clone, Copy)]
pub struct ModuleResolver<'a> {
    tree: &'a SourceTree,
    manifest: Option<&'a PackageManifest>,
}

impl<'a> ModuleResolver<'a> {
    pub fn new(tree: &'a SourceTree, manifest: Option<&'a PackageManifest>) -> Self {
        Self { tree, manifest }
    }

    /// Resolve `specifier` as referenced from the file at `from`.
    pub fn resolve(&self, from: &str, specifier: &str) -> Resolution {
        if is_relative_specifier(specifier) {
            if is_style_specifier(specifier) {
                return Resolution::Style;
            }
            return match self.target(from, specifier) {
                Some(target) => self.lookup(&target),
                None => Resolution::UnresolvedRelative,
            };
        }
        if specifier.starts_with('/') || has_scheme(specifier) {
            return Resolution::Unsupported;
        }
        match package_name(specifier) {
            Some(name) if NODE_BUILTINS.contains(&name.as_str()) => Resolution::Unsupported,
            Some(name) if self.manifest.is_some_and(|m| m.has_package(&name)) => {
                Resolution::Package(name)
            }
            Some(name) => Resolution::UnresolvedPackage(name),
            None => Resolution::Unsupported,
        }
    }

    /// Normalized tree path a relative specifier points at, before probing.
    pub fn target(&self, from: &str, specifier: &str) -> Option<String> {
        normalize(parent_dir(from), specifier)
    }

    fn lookup(&self, target: &str) -> Resolution {
        for suffix in PROBE_SUFFIXES {
            let candidate = match (target.is_empty(), suffix.strip_prefix('/')) {
                (true, Some(bare)) => bare.to_string(),
                (true, None) => continue,
                (false, _) => format!("{target}{suffix}"),
            };
            if self.tree.contains(&candidate) {
                return Resolution::File(candidate);
            }
        }
        Resolution::UnresolvedRelative
    }
}

/// Memoized resolutions for every reference in the symbol table.
///
/// Built once before any rule runs, so rules only look outcomes up.
#[derive(Debug, Clone, Default)]
pub struct ResolutionTable {
    entries: BTreeMap<String, BTreeMap<String, Resolution>>,
}

impl ResolutionTable {
    pub fn build(resolver: &ModuleResolver<'_>, symbols: &SymbolTable) -> Self {
        let mut entries: BTreeMap<String, BTreeMap<String, Resolution>> = BTreeMap::new();
        for (path, file) in symbols.iter() {
            let per_file = entries.entry(path.to_string()).or_default();
            for reference in &file.references {
                per_file
                    .entry(reference.specifier.clone())
                    .or_insert_with(|| resolver.resolve(path, &reference.specifier));
            }
        }
        let table = Self { entries };
        tracing::debug!(resolutions = table.len(), "resolution table built");
        table
    }

    pub fn get(&self, from: &str, specifier: &str) -> Option<&Resolution> {
        self.entries.get(from)?.get(specifier)
    }

    /// Number of memoized `(file, specifier)` pairs.
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{FileContent, SourceFile};
    use rstest::rstest;

    fn tree(paths: &[&str]) -> SourceTree {
        SourceTree::from_files(
            "/p",
            paths
                .iter()
                .map(|p| SourceFile::new(*p, FileContent::Text(String::new()))),
        )
    }

    fn manifest(packages: &[&str]) -> PackageManifest {
        let mut m = PackageManifest::default();
        for p in packages {
            m.dependencies.insert(p.to_string(), serde_json::Value::from("*"));
        }
        m
    }

    #[rstest]
    #[case("src/router", "../views", Some("src/views"))]
    #[case("src", "./App", Some("src/App"))]
    #[case("src/components", ".", Some("src/components"))]
    #[case("src", "../../escape", None)]
    #[case("", "./index.css", Some("index.css"))]
    fn test_normalize(#[case] base: &str, #[case] spec: &str, #[case] expected: Option<&str>) {
        assert_eq!(normalize(base, spec).as_deref(), expected);
    }

    #[rstest]
    #[case("react", Some("react"))]
    #[case("react-dom/client", Some("react-dom"))]
    #[case("@vitejs/plugin-react", Some("@vitejs/plugin-react"))]
    #[case("@tanstack/react-query/devtools", Some("@tanstack/react-query"))]
    #[case("", None)]
    fn test_package_name(#[case] spec: &str, #[case] expected: Option<&str>) {
        assert_eq!(package_name(spec).as_deref(), expected);
    }

    #[test]
    fn test_suffix_order() {
        let t = tree(&["src/views/Home.tsx", "src/views/index.ts", "src/App.tsx"]);
        let r = ModuleResolver::new(&t, None);
        assert_eq!(r.resolve("src/App.tsx", "./views"), Resolution::File("src/views/index.ts".into()));
        assert_eq!(
            r.resolve("src/views/index.ts", "./Home"),
            Resolution::File("src/views/Home.tsx".into())
        );
        assert_eq!(r.resolve("src/App.tsx", "./Missing"), Resolution::UnresolvedRelative);
    }

    #[test]
    fn test_ts_wins_over_tsx() {
        let t = tree(&["src/api.ts", "src/api.tsx"]);
        let r = ModuleResolver::new(&t, None);
        assert_eq!(r.resolve("src/main.tsx", "./api"), Resolution::File("src/api.ts".into()));
    }

    #[test]
    fn test_bare_and_special_specifiers() {
        let t = tree(&[]);
        let m = manifest(&["react", "react-dom"]);
        let r = ModuleResolver::new(&t, Some(&m));
        assert_eq!(r.resolve("src/main.tsx", "react-dom/client"), Resolution::Package("react-dom".into()));
        assert_eq!(
            r.resolve("src/main.tsx", "left-pad"),
            Resolution::UnresolvedPackage("left-pad".into())
        );
        assert_eq!(r.resolve("src/main.tsx", "./index.css"), Resolution::Style);
        assert_eq!(r.resolve("src/main.tsx", "node:path"), Resolution::Unsupported);
        assert_eq!(r.resolve("vite.config.ts", "path"), Resolution::Unsupported);
        assert_eq!(r.resolve("vite.config.ts", "fs/promises"), Resolution::Unsupported);
        assert_eq!(r.resolve("src/main.tsx", "/abs/file"), Resolution::Unsupported);
    }

    #[rstest]
    #[case("readline")]
    #[case("net")]
    #[case("tls")]
    #[case("dns/promises")]
    #[case("timers/promises")]
    #[case("perf_hooks")]
    #[case("string_decoder")]
    #[case("worker_threads")]
    fn test_builtins_are_not_packages(#[case] specifier: &str) {
        let t = tree(&["vite.config.ts"]);
        let m = manifest(&["vite"]);
        let r = ModuleResolver::new(&t, Some(&m));
        assert_eq!(r.resolve("vite.config.ts", specifier), Resolution::Unsupported);
    }

    #[test]
    fn test_no_manifest_leaves_packages_unresolved() {
        let t = tree(&[]);
        let r = ModuleResolver::new(&t, None);
        assert!(r.resolve("src/main.tsx", "react").is_unresolved());
    }
}
