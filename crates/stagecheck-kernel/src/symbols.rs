//! Per-file symbol table.
//!
//! For every module file the table holds the extracted export forms, the
//! file's own export names, its outgoing references and any export conflicts.
//! Effective export sets (own names plus transitively expanded wildcards)
//! are computed on demand against a [`ResolutionTable`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::resolver::{Resolution, ResolutionTable};
use crate::scanner::SourceTree;
use crate::syntax::{ExportForm, ImportReference, extract_exports, extract_imports, strip_comments};

/// Sentinel name for a default export.
pub const DEFAULT_EXPORT: &str = "default";

/// Sentinel name for a wildcard re-export.
pub const WILDCARD_EXPORT: &str = "*";

/// Symbols of one module file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSymbols {
    pub forms: Vec<ExportForm>,
    /// Names contributed directly by this file, including sentinels.
    pub exports: BTreeSet<String>,
    pub references: Vec<ImportReference>,
    pub conflicts: Vec<ExportConflict>,
    /// The file could not be read; nothing is known about its exports.
    pub unreadable: bool,
}

impl FileSymbols {
    /// Extract symbols from raw module text.
    pub fn from_source(path: &str, source: &str) -> Self {
        let text = strip_comments(source);
        let forms = extract_exports(&text);
        let mut references = extract_imports(&text);
        references.extend(forms.iter().filter_map(ExportForm::reference));
        references.sort_by_key(|r| r.line);

        let exports = forms
            .iter()
            .flat_map(ExportForm::names)
            .map(str::to_string)
            .collect();
        let conflicts = find_conflicts(path, &forms);

        Self {
            forms,
            exports,
            references,
            conflicts,
            unreadable: false,
        }
    }

    fn unreadable() -> Self {
        Self {
            unreadable: true,
            ..Self::default()
        }
    }

    /// Specifiers of `export * from` forms.
    pub fn wildcard_sources(&self) -> impl Iterator<Item = &str> {
        self.forms.iter().filter_map(|f| match f {
            ExportForm::Wildcard { source, .. } => Some(source.as_str()),
            _ => None,
        })
    }

    pub fn has_default(&self) -> bool {
        self.exports.contains(DEFAULT_EXPORT)
    }
}

/// Why a file's exports are ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConflictKind {
    /// Declared with `export const X` and listed in a local `export { X }`.
    DeclaredAndListed,
    /// Appears in more than one export list.
    ListedTwice,
    /// More than one default export.
    MultipleDefaults,
}

/// An ambiguous export in one file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExportConflict {
    pub path: String,
    pub name: String,
    pub kind: ConflictKind,
}

impl fmt::Display for ExportConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = &self.name;
        match self.kind {
            ConflictKind::DeclaredAndListed => write!(
                f,
                "duplicate export '{name}': declared with 'export const {name}' and listed in 'export {{ {name} }}'; remove it from the list"
            ),
            ConflictKind::ListedTwice => {
                write!(f, "duplicate export '{name}': listed in more than one export list")
            }
            ConflictKind::MultipleDefaults => write!(f, "more than one default export"),
        }
    }
}

fn find_conflicts(path: &str, forms: &[ExportForm]) -> Vec<ExportConflict> {
    let mut declared: BTreeSet<&str> = BTreeSet::new();
    let mut local_listed: BTreeSet<&str> = BTreeSet::new();
    let mut list_counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut defaults = 0usize;

    for form in forms {
        match form {
            ExportForm::Declaration { name, .. } => {
                declared.insert(name);
            }
            ExportForm::List { entries, source, .. } => {
                for entry in entries {
                    if entry.exported == DEFAULT_EXPORT {
                        defaults += 1;
                        continue;
                    }
                    if source.is_none() {
                        local_listed.insert(&entry.local);
                    }
                    *list_counts.entry(&entry.exported).or_default() += 1;
                }
            }
            ExportForm::Default { .. } => defaults += 1,
            ExportForm::NamespaceReexport { .. } | ExportForm::Wildcard { .. } => {}
        }
    }

    let mut conflicts: Vec<ExportConflict> = declared
        .intersection(&local_listed)
        .map(|name| ExportConflict {
            path: path.to_string(),
            name: name.to_string(),
            kind: ConflictKind::DeclaredAndListed,
        })
        .collect();
    conflicts.extend(list_counts.into_iter().filter(|(_, n)| *n > 1).map(|(name, _)| {
        ExportConflict {
            path: path.to_string(),
            name: name.to_string(),
            kind: ConflictKind::ListedTwice,
        }
    }));
    if defaults > 1 {
        conflicts.push(ExportConflict {
            path: path.to_string(),
            name: DEFAULT_EXPORT.to_string(),
            kind: ConflictKind::MultipleDefaults,
        });
    }
    conflicts.sort();
    conflicts
}

/// The names a file makes available to importers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSet {
    names: BTreeSet<String>,
    opaque: bool,
}

impl ExportSet {
    /// Whether a requested name is satisfied.
    ///
    /// An opaque set satisfies every name.
    pub fn provides(&self, name: &str) -> bool {
        self.opaque || self.names.contains(name)
    }

    /// Set when a wildcard source could not be followed.
    pub fn is_opaque(&self) -> bool {
        self.opaque
    }

    pub fn has_default(&self) -> bool {
        self.names.contains(DEFAULT_EXPORT)
    }

    /// Exported names other than `"default"`, sorted.
    pub fn named(&self) -> impl Iterator<Item = &str> {
        self.names
            .iter()
            .map(String::as_str)
            .filter(|n| *n != DEFAULT_EXPORT)
    }

    pub fn is_empty(&self) -> bool {
        !self.opaque && self.names.is_empty()
    }
}

/// Symbols for every module file of the tree.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    files: BTreeMap<String, FileSymbols>,
}

impl SymbolTable {
    /// Extract symbols and references from every module file.
    pub fn build(tree: &SourceTree) -> Self {
        let files: BTreeMap<String, FileSymbols> = tree
            .modules()
            .map(|file| {
                let symbols = match file.text() {
                    Ok(text) => FileSymbols::from_source(&file.path, text),
                    Err(_) => FileSymbols::unreadable(),
                };
                tracing::debug!(
                    path = %file.path,
                    exports = symbols.exports.len(),
                    references = symbols.references.len(),
                    "symbols extracted"
                );
                (file.path.clone(), symbols)
            })
            .collect();
        Self { files }
    }

    pub fn get(&self, path: &str) -> Option<&FileSymbols> {
        self.files.get(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileSymbols)> {
        self.files.iter().map(|(path, symbols)| (path.as_str(), symbols))
    }

    /// All export conflicts, ordered by file.
    pub fn conflicts(&self) -> impl Iterator<Item = &ExportConflict> {
        self.files.values().flat_map(|f| f.conflicts.iter())
    }

    /// Number of files that export at least one name.
    pub fn exporting_files(&self) -> usize {
        self.files.values().filter(|f| !f.exports.is_empty()).count()
    }

    /// The effective export set of `path`.
    ///
    /// Own names, plus for every `export * from X` that resolves to a tree
    /// file the effective names of `X` without `"default"`. A wildcard that
    /// cannot be followed makes the set opaque. Cycles contribute nothing on
    /// the second visit. Files without symbols (non-module, unreadable) are
    /// opaque.
    pub fn effective_exports(&self, path: &str, resolutions: &ResolutionTable) -> ExportSet {
        let mut visiting = BTreeSet::new();
        self.expand(path, resolutions, &mut visiting)
    }

    fn expand<'s>(
        &'s self,
        path: &'s str,
        resolutions: &ResolutionTable,
        visiting: &mut BTreeSet<&'s str>,
    ) -> ExportSet {
        let Some(file) = self.files.get(path).filter(|f| !f.unreadable) else {
            return ExportSet {
                names: BTreeSet::new(),
                opaque: true,
            };
        };
        if !visiting.insert(path) {
            return ExportSet::default();
        }

        let mut set = ExportSet {
            names: file
                .exports
                .iter()
                .filter(|n| *n != WILDCARD_EXPORT)
                .cloned()
                .collect(),
            opaque: false,
        };

        for source in file.wildcard_sources() {
            match resolutions.get(path, source) {
                Some(Resolution::File(target)) => match self.files.get_key_value(target.as_str()) {
                    Some((target, _)) => {
                        let inner = self.expand(target, resolutions, visiting);
                        set.opaque |= inner.opaque;
                        set.names
                            .extend(inner.names.into_iter().filter(|n| n != DEFAULT_EXPORT));
                    }
                    None => set.opaque = true,
                },
                _ => set.opaque = true,
            }
        }
        set
    }
}
