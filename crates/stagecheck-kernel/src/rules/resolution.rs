//! Resolution rules: relative references land on files that export what
//! the referencing file asks for, and no file exports a name ambiguously.

use super::{Category, Rule, RuleOutcome};
use crate::context::AnalysisContext;
use crate::resolver::Resolution;
use crate::symbols::{DEFAULT_EXPORT, ExportSet, FileSymbols};
use crate::syntax::{ImportReference, ReferenceKind, strip_comments};

/// Every relative reference from a module file resolves, and every name it
/// requests is exported by the target.
#[derive(Debug, Clone, Copy)]
pub struct ImportResolutionRule;

impl Rule for ImportResolutionRule {
    fn name(&self) -> &str {
        "Import Resolution"
    }

    fn category(&self) -> Category {
        Category::Resolution
    }

    fn evaluate(&self, ctx: &AnalysisContext) -> RuleOutcome {
        let mut outcome = RuleOutcome::new(self.name(), self.category());
        for (file, symbols) in ctx.modules() {
            if let Err(e) = file.text() {
                outcome.file_error(&e);
                continue;
            }
            for reference in symbols.references.iter().filter(|r| r.is_relative()) {
                match ctx.resolve(&file.path, &reference.specifier) {
                    Resolution::File(target) => {
                        check_requested(ctx, &file.path, reference, &target, &mut outcome);
                    }
                    Resolution::UnresolvedRelative => {
                        let message = unresolved_message(ctx, &file.path, reference);
                        outcome.error(Some(file.path.as_str()), message);
                    }
                    Resolution::Style
                    | Resolution::Unsupported
                    | Resolution::Package(_)
                    | Resolution::UnresolvedPackage(_) => {}
                }
            }
        }
        outcome
    }
}

fn unresolved_message(ctx: &AnalysisContext, from: &str, reference: &ImportReference) -> String {
    let ImportReference { specifier, line, .. } = reference;
    match ctx.resolver().target(from, specifier) {
        None => format!("line {line}: import '{specifier}' escapes the project root"),
        Some(dir) if ctx.tree().has_dir(&dir) => {
            format!("line {line}: import '{specifier}' is a directory ({dir}) without index.ts or index.tsx")
        }
        Some(_) => format!("line {line}: import path not found '{specifier}'"),
    }
}

fn is_barrel(path: &str) -> bool {
    matches!(
        path.rsplit('/').next(),
        Some("index.ts" | "index.tsx" | "index.js" | "index.jsx")
    )
}

fn check_requested(
    ctx: &AnalysisContext,
    from: &str,
    reference: &ImportReference,
    target: &str,
    outcome: &mut RuleOutcome,
) {
    let requested = reference.requested_names();
    if requested.is_empty() {
        return;
    }
    // Non-module targets (JSON, assets) and unreadable files are opaque.
    let Some(target_symbols) = ctx.symbols().get(target).filter(|s| !s.unreadable) else {
        return;
    };
    let ImportReference { specifier, line, .. } = reference;

    if is_barrel(target) {
        let empty = ctx
            .file(target)
            .and_then(|f| f.text().ok())
            .is_some_and(|text| strip_comments(text).trim().is_empty());
        if empty {
            outcome.error(
                Some(from),
                format!("line {line}: '{specifier}' resolves to barrel {target}, which is empty"),
            );
            return;
        }
        if target_symbols.forms.is_empty() {
            outcome.error(
                Some(from),
                format!("line {line}: '{specifier}' resolves to barrel {target}, which has no exports"),
            );
            return;
        }
    }

    let exports = ctx.effective_exports(target);
    for name in requested {
        if exports.provides(name) {
            continue;
        }
        let hint = mismatch_hint(ctx, reference, name, target, target_symbols, &exports);
        outcome.error(Some(from), format!("line {line}: {hint}"));
    }
}

/// Explain why `name` is not available from `target`.
fn mismatch_hint(
    ctx: &AnalysisContext,
    reference: &ImportReference,
    name: &str,
    target: &str,
    target_symbols: &FileSymbols,
    exports: &ExportSet,
) -> String {
    let specifier = &reference.specifier;

    if name == DEFAULT_EXPORT {
        if let ReferenceKind::Single { binding } = &reference.kind {
            if exports.provides(binding) {
                return format!(
                    "default import '{binding}' from '{specifier}' but {target} has no default export; use import {{ {binding} }} from '{specifier}'"
                );
            }
        }
        return format!(
            "'{specifier}' has no default export ({target} exports: {})",
            available(exports)
        );
    }

    if is_barrel(target) {
        let wraps_default = target_symbols
            .wildcard_sources()
            .filter(|source| sibling_stem(source) == Some(name))
            .filter_map(|source| ctx.resolve(target, source).file().map(str::to_string))
            .any(|member| ctx.symbols().get(&member).is_some_and(FileSymbols::has_default));
        if wraps_default {
            return format!(
                "'{name}' is not exported by {target}: it has export * from './{name}' but that file uses export default; use export {{ default as {name} }} from './{name}'"
            );
        }
    }

    if exports.has_default() && matches!(reference.kind, ReferenceKind::Grouped { .. }) {
        return format!(
            "named import '{name}' from '{specifier}' but {target} only exports it as default; use import {name} from '{specifier}'"
        );
    }

    format!(
        "'{name}' is not exported by {target} (available: {})",
        available(exports)
    )
}

fn sibling_stem(source: &str) -> Option<&str> {
    let name = source.strip_prefix("./")?;
    Some(name.rsplit_once('.').map_or(name, |(stem, _)| stem))
}

fn available(exports: &ExportSet) -> String {
    let names: Vec<&str> = exports.named().collect();
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

/// No module exports a name ambiguously.
#[derive(Debug, Clone, Copy)]
pub struct ExportConsistencyRule;

impl Rule for ExportConsistencyRule {
    fn name(&self) -> &str {
        "Export Consistency"
    }

    fn category(&self) -> Category {
        Category::Ambiguity
    }

    fn evaluate(&self, ctx: &AnalysisContext) -> RuleOutcome {
        let mut outcome = RuleOutcome::new(self.name(), self.category());
        for conflict in ctx.symbols().conflicts() {
            outcome.error(Some(conflict.path.as_str()), conflict.to_string());
        }
        outcome
    }
}
