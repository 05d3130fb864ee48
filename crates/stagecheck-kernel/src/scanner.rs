//! Artifact tree scanner.
//!
//! Walks the artifact root once and reads every file into memory. Later
//! stages (extraction, resolution, rules) only ever consult the resulting
//! [`SourceTree`]; nothing touches the filesystem after the scan.
//!
//! Dependency caches and build outputs are pruned during the walk. Hidden
//! files are kept and `.gitignore` is not honored: a generated `.gitignore`
//! usually lists `.env`, which is itself an artifact under validation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use ignore::WalkBuilder;

use crate::error::{Result, RuleError, ValidatorError};

/// Directory names never descended into.
pub const SKIPPED_DIRS: &[&str] = &["node_modules", "dist", "build", ".vite", ".git", "coverage"];

/// Coarse classification of a scanned file by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCategory {
    /// `.ts`, `.tsx`, `.js`, `.jsx`, `.mjs`, `.cjs`
    Module,
    /// `.json`
    Manifest,
    /// `.html`
    Markup,
    /// `.css`, `.scss`, `.sass`, `.less`
    Style,
    /// `.env`, `.env.local`, ...
    Env,
    Other,
}

impl FileCategory {
    /// Classify a file by its name.
    pub fn from_path(path: &str) -> Self {
        let name = path.rsplit('/').next().unwrap_or(path);
        if name == ".env" || name.starts_with(".env.") {
            return Self::Env;
        }
        match name.rsplit_once('.').map(|(_, ext)| ext) {
            Some("ts" | "tsx" | "js" | "jsx" | "mjs" | "cjs") => Self::Module,
            Some("json") => Self::Manifest,
            Some("html") => Self::Markup,
            Some("css" | "scss" | "sass" | "less") => Self::Style,
            _ => Self::Other,
        }
    }
}

/// File content as captured by the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Text(String),
    /// The bytes could not be read or are not UTF-8.
    Unreadable(String),
}

/// One file of the artifact tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to the artifact root, `/`-separated.
    pub path: String,
    pub category: FileCategory,
    pub content: FileContent,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, content: FileContent) -> Self {
        let path = path.into();
        Self {
            category: FileCategory::from_path(&path),
            path,
            content,
        }
    }

    /// The file's text, or the reason it is unavailable.
    pub fn text(&self) -> std::result::Result<&str, RuleError> {
        match &self.content {
            FileContent::Text(text) => Ok(text),
            FileContent::Unreadable(reason) => Err(RuleError::Unreadable {
                path: self.path.clone(),
                reason: reason.clone(),
            }),
        }
    }

    pub fn is_readable(&self) -> bool {
        matches!(self.content, FileContent::Text(_))
    }

    /// File name without directories.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// File name without its final extension.
    pub fn stem(&self) -> &str {
        let name = self.file_name();
        name.rsplit_once('.').map_or(name, |(stem, _)| stem)
    }

    /// Directory part of the path, empty for files at the root.
    pub fn dir(&self) -> &str {
        self.path.rsplit_once('/').map_or("", |(dir, _)| dir)
    }
}

/// Every file beneath the artifact root, keyed by relative path.
#[derive(Debug, Clone, Default)]
pub struct SourceTree {
    root: PathBuf,
    files: BTreeMap<String, SourceFile>,
}

impl SourceTree {
    /// Walk `root` and read every file.
    ///
    /// A missing root is fatal. Unreadable files and walk errors on single
    /// entries are not.
    pub fn scan(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(ValidatorError::RootMissing(root.to_path_buf()));
        }

        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .hidden(false)
            .follow_links(false)
            .filter_entry(|entry| {
                let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                !(is_dir && entry.depth() > 0 && SKIPPED_DIRS.iter().any(|d| entry.file_name() == *d))
            })
            .build();

        let mut files = BTreeMap::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unwalkable entry");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let Some(rel) = relative_path(root, entry.path()) else {
                continue;
            };
            let content = match fs::read(entry.path()) {
                Ok(bytes) => match String::from_utf8(bytes) {
                    Ok(text) => FileContent::Text(text),
                    Err(_) => {
                        tracing::warn!(path = %rel, "file is not valid UTF-8");
                        FileContent::Unreadable("stream did not contain valid UTF-8".to_string())
                    }
                },
                Err(e) => {
                    tracing::warn!(path = %rel, error = %e, "failed to read file");
                    FileContent::Unreadable(e.to_string())
                }
            };
            files.insert(rel.clone(), SourceFile::new(rel, content));
        }

        tracing::info!(root = %root.display(), files = files.len(), "artifact tree scanned");
        Ok(Self {
            root: root.to_path_buf(),
            files,
        })
    }

    /// Build a tree from in-memory files.
    pub fn from_files(root: impl Into<PathBuf>, files: impl IntoIterator<Item = SourceFile>) -> Self {
        Self {
            root: root.into(),
            files: files.into_iter().map(|f| (f.path.clone(), f)).collect(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn get(&self, path: &str) -> Option<&SourceFile> {
        self.files.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Whether any scanned file lives beneath `dir`.
    pub fn has_dir(&self, dir: &str) -> bool {
        let prefix = format!("{}/", dir.trim_end_matches('/'));
        self.files
            .range(prefix.clone()..)
            .next()
            .is_some_and(|(path, _)| path.starts_with(&prefix))
    }

    /// Files directly inside `dir` (not in subdirectories), in path order.
    pub fn files_in<'a>(&'a self, dir: &str) -> impl Iterator<Item = &'a SourceFile> + use<'a> {
        let dir = dir.trim_end_matches('/').to_string();
        self.files.values().filter(move |f| f.dir() == dir)
    }

    /// All files in path order.
    pub fn files(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.values()
    }

    /// Module files in path order.
    pub fn modules(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.values().filter(|f| f.category == FileCategory::Module)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("src/App.tsx", FileCategory::Module)]
    #[case("src/main.ts", FileCategory::Module)]
    #[case("vite.config.mjs", FileCategory::Module)]
    #[case("package.json", FileCategory::Manifest)]
    #[case("index.html", FileCategory::Markup)]
    #[case("src/App.css", FileCategory::Style)]
    #[case(".env", FileCategory::Env)]
    #[case(".env.local", FileCategory::Env)]
    #[case("README.md", FileCategory::Other)]
    #[case("Makefile", FileCategory::Other)]
    fn test_category(#[case] path: &str, #[case] expected: FileCategory) {
        assert_eq!(FileCategory::from_path(path), expected);
    }

    #[test]
    fn test_source_file_parts() {
        let file = SourceFile::new("src/views/OrderView.tsx", FileContent::Text(String::new()));
        assert_eq!(file.file_name(), "OrderView.tsx");
        assert_eq!(file.stem(), "OrderView");
        assert_eq!(file.dir(), "src/views");

        let top = SourceFile::new("index.html", FileContent::Text(String::new()));
        assert_eq!(top.dir(), "");
    }

    #[test]
    fn test_unreadable_text_is_rule_error() {
        let file = SourceFile::new("src/bad.ts", FileContent::Unreadable("boom".into()));
        assert!(!file.is_readable());
        assert_eq!(
            file.text(),
            Err(RuleError::Unreadable {
                path: "src/bad.ts".into(),
                reason: "boom".into()
            })
        );
    }

    #[test]
    fn test_scan_skips_caches_and_keeps_hidden() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        fs::create_dir_all(root.join("src/views")).expect("mkdir");
        fs::create_dir_all(root.join("node_modules/react")).expect("mkdir");
        fs::create_dir_all(root.join("dist")).expect("mkdir");
        fs::write(root.join("src/views/Home.tsx"), "export default Home;").expect("write");
        fs::write(root.join("node_modules/react/index.js"), "module.exports = {}").expect("write");
        fs::write(root.join("dist/bundle.js"), "").expect("write");
        fs::write(root.join(".env"), "VITE_API_BASE_URL=http://x").expect("write");
        fs::write(root.join(".gitignore"), ".env\n").expect("write");
        fs::write(root.join("src/blob.ts"), [0xff, 0xfe, 0x00]).expect("write");

        let tree = SourceTree::scan(root).expect("scan");
        assert!(tree.contains("src/views/Home.tsx"));
        assert!(tree.contains(".env"));
        assert!(!tree.contains("node_modules/react/index.js"));
        assert!(!tree.contains("dist/bundle.js"));
        assert!(tree.has_dir("src/views"));
        assert!(!tree.has_dir("src/view"));

        let blob = tree.get("src/blob.ts").expect("unreadable file is still scanned");
        assert!(!blob.is_readable());
    }

    #[test]
    fn test_scan_missing_root() {
        let err = SourceTree::scan(Path::new("/no/such/generated_project")).unwrap_err();
        assert!(matches!(err, ValidatorError::RootMissing(_)));
    }

    #[test]
    fn test_files_in_is_not_recursive() {
        let text = || FileContent::Text(String::new());
        let tree = SourceTree::from_files(
            "/p",
            [
                SourceFile::new("src/components/Layout.tsx", text()),
                SourceFile::new("src/components/forms/Input.tsx", text()),
            ],
        );
        let names: Vec<_> = tree.files_in("src/components").map(|f| f.file_name()).collect();
        assert_eq!(names, vec!["Layout.tsx"]);
    }
}
