//! The immutable bundle every rule reads.
//!
//! Built once per run: the scanned tree, the project configuration, the
//! package manifest, the symbol table and the memoized resolution table. Rules
//! receive `&AnalysisContext` and cannot mutate or observe each other.

use std::collections::BTreeSet;

use crate::config::ProjectConfig;
use crate::error::RuleError;
use crate::manifest::PackageManifest;
use crate::resolver::{ModuleResolver, Resolution, ResolutionTable};
use crate::scanner::{SourceFile, SourceTree};
use crate::symbols::{ExportSet, FileSymbols, SymbolTable};

/// Everything a rule may consult.
#[derive(Debug)]
pub struct AnalysisContext {
    tree: SourceTree,
    config: ProjectConfig,
    manifest: Result<Option<PackageManifest>, RuleError>,
    symbols: SymbolTable,
    resolutions: ResolutionTable,
}

impl AnalysisContext {
    /// Extract symbols and resolve every reference in `tree`.
    pub fn new(tree: SourceTree, config: ProjectConfig) -> Self {
        let manifest = PackageManifest::from_tree(&tree);
        let symbols = SymbolTable::build(&tree);
        let resolutions = {
            let resolver = ModuleResolver::new(&tree, manifest.as_ref().ok().and_then(Option::as_ref));
            ResolutionTable::build(&resolver, &symbols)
        };
        tracing::info!(
            modules = symbols.iter().count(),
            resolutions = resolutions.len(),
            "analysis context ready"
        );
        Self {
            tree,
            config,
            manifest,
            symbols,
            resolutions,
        }
    }

    pub fn tree(&self) -> &SourceTree {
        &self.tree
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// The parsed manifest, if present and valid.
    pub fn manifest(&self) -> Option<&PackageManifest> {
        self.manifest.as_ref().ok().and_then(Option::as_ref)
    }

    /// Why the manifest could not be loaded, if it exists but is broken.
    pub fn manifest_error(&self) -> Option<&RuleError> {
        self.manifest.as_ref().err()
    }

    pub fn file(&self, path: &str) -> Option<&SourceFile> {
        self.tree.get(path)
    }

    /// Resolution of `specifier` from `from`.
    ///
    /// Served from the memoized table; specifiers never seen during
    /// extraction are resolved on the spot.
    pub fn resolve(&self, from: &str, specifier: &str) -> Resolution {
        match self.resolutions.get(from, specifier) {
            Some(resolution) => resolution.clone(),
            None => self.resolver().resolve(from, specifier),
        }
    }

    pub fn resolver(&self) -> ModuleResolver<'_> {
        ModuleResolver::new(&self.tree, self.manifest())
    }

    pub fn effective_exports(&self, path: &str) -> ExportSet {
        self.symbols.effective_exports(path, &self.resolutions)
    }

    /// Module files with their symbols, in path order.
    pub fn modules(&self) -> impl Iterator<Item = (&SourceFile, &FileSymbols)> {
        self.tree
            .modules()
            .filter_map(|f| self.symbols.get(&f.path).map(|s| (f, s)))
    }

    /// Distinct bare packages referenced from any module file.
    pub fn referenced_packages(&self) -> BTreeSet<String> {
        self.modules()
            .flat_map(|(file, symbols)| {
                symbols
                    .references
                    .iter()
                    .map(move |r| self.resolve(&file.path, &r.specifier))
            })
            .filter_map(|resolution| match resolution {
                Resolution::Package(name) | Resolution::UnresolvedPackage(name) => Some(name),
                _ => None,
            })
            .collect()
    }
}
