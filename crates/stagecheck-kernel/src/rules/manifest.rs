//! Manifest rules: the baseline `package.json` and the packages source
//! modules actually reference.

use std::collections::BTreeMap;

use super::{Category, Rule, RuleOutcome};
use crate::context::AnalysisContext;
use crate::manifest::MANIFEST_PATH;
use crate::resolver::Resolution;

/// Runtime packages every generated project depends on.
pub const REQUIRED_DEPENDENCIES: &[&str] = &["react", "react-dom", "react-router-dom", "axios"];

/// Build-time packages every generated project depends on.
pub const REQUIRED_DEV_DEPENDENCIES: &[&str] = &[
    "@types/react",
    "@types/react-dom",
    "@vitejs/plugin-react",
    "typescript",
    "vite",
];

pub const REQUIRED_SCRIPTS: &[&str] = &["dev", "build"];

#[derive(Debug, Clone, Copy)]
pub struct PackageManifestRule;

impl Rule for PackageManifestRule {
    fn name(&self) -> &str {
        "Package Manifest"
    }

    fn category(&self) -> Category {
        Category::Manifest
    }

    fn evaluate(&self, ctx: &AnalysisContext) -> RuleOutcome {
        let mut outcome = RuleOutcome::new(self.name(), self.category());
        if let Some(e) = ctx.manifest_error() {
            outcome.file_error(e);
            return outcome;
        }
        let Some(manifest) = ctx.manifest() else {
            outcome.error(Some(MANIFEST_PATH), "file not found");
            return outcome;
        };

        for dep in REQUIRED_DEPENDENCIES {
            if !manifest.has_package(dep) {
                outcome.error(Some(MANIFEST_PATH), format!("missing required dependency '{dep}'"));
            }
        }
        for dep in REQUIRED_DEV_DEPENDENCIES {
            if !manifest.has_package(dep) {
                outcome.error(Some(MANIFEST_PATH), format!("missing required dev dependency '{dep}'"));
            }
        }
        for script in REQUIRED_SCRIPTS {
            if !manifest.has_script(script) {
                outcome.error(Some(MANIFEST_PATH), format!("missing script '{script}'"));
            }
        }
        outcome
    }
}

/// Every bare package a module file references is declared.
#[derive(Debug, Clone, Copy)]
pub struct ExternalPackagesRule;

impl Rule for ExternalPackagesRule {
    fn name(&self) -> &str {
        "External Packages"
    }

    fn category(&self) -> Category {
        Category::Manifest
    }

    fn evaluate(&self, ctx: &AnalysisContext) -> RuleOutcome {
        let mut outcome = RuleOutcome::new(self.name(), self.category());
        // Without a usable manifest every package would be reported; the
        // manifest rule already covers that.
        if ctx.manifest().is_none() {
            return outcome;
        }

        let mut missing: BTreeMap<String, (&str, usize)> = BTreeMap::new();
        for (file, symbols) in ctx.modules() {
            for reference in &symbols.references {
                if let Resolution::UnresolvedPackage(name) = ctx.resolve(&file.path, &reference.specifier) {
                    missing.entry(name).or_insert((file.path.as_str(), reference.line));
                }
            }
        }

        for (package, (path, line)) in missing {
            outcome.error(
                Some(path),
                format!("package '{package}' is imported (line {line}) but not declared in {MANIFEST_PATH}"),
            );
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;
    use crate::scanner::{FileContent, SourceFile, SourceTree};

    const FULL_MANIFEST: &str = r#"{
        "name": "app",
        "scripts": { "dev": "vite", "build": "tsc && vite build" },
        "dependencies": { "react": "^18", "react-dom": "^18", "react-router-dom": "^6", "axios": "^1" },
        "devDependencies": {
            "@types/react": "^18", "@types/react-dom": "^18", "@vitejs/plugin-react": "^4",
            "typescript": "^5", "vite": "^5"
        }
    }"#;

    fn ctx(files: &[(&str, &str)]) -> AnalysisContext {
        let tree = SourceTree::from_files(
            "/p",
            files
                .iter()
                .map(|(p, t)| SourceFile::new(*p, FileContent::Text(t.to_string()))),
        );
        AnalysisContext::new(tree, ProjectConfig::default())
    }

    #[test]
    fn test_full_manifest_passes() {
        let outcome = PackageManifestRule.evaluate(&ctx(&[("package.json", FULL_MANIFEST)]));
        assert!(outcome.findings.is_empty(), "{:?}", outcome.findings);
    }

    #[test]
    fn test_missing_manifest() {
        let outcome = PackageManifestRule.evaluate(&ctx(&[]));
        assert_eq!(outcome.findings.len(), 1);
        assert_eq!(outcome.findings[0].message, "file not found");
    }

    #[test]
    fn test_broken_manifest_is_file_error() {
        let outcome = PackageManifestRule.evaluate(&ctx(&[("package.json", "{ not json")]));
        assert_eq!(outcome.findings.len(), 1);
        assert_eq!(outcome.findings[0].path.as_deref(), Some("package.json"));
        assert!(outcome.findings[0].message.starts_with("invalid manifest"));
    }

    #[test]
    fn test_each_missing_entry_reported() {
        let manifest = r#"{ "scripts": { "dev": "vite" }, "dependencies": { "react": "18" } }"#;
        let outcome = PackageManifestRule.evaluate(&ctx(&[("package.json", manifest)]));
        let missing = REQUIRED_DEPENDENCIES.len() - 1 + REQUIRED_DEV_DEPENDENCIES.len() + 1;
        assert_eq!(outcome.findings.len(), missing);
        assert!(outcome.findings.iter().any(|f| f.message == "missing script 'build'"));
    }

    #[test]
    fn test_undeclared_package_reported_once() {
        let ctx = ctx(&[
            ("package.json", FULL_MANIFEST),
            ("src/a.ts", "import pad from 'left-pad';\nimport React from 'react';"),
            ("src/b.ts", "import pad from 'left-pad';"),
            ("src/c.ts", "import { Client } from '@acme/sdk/client';"),
        ]);
        let outcome = ExternalPackagesRule.evaluate(&ctx);
        let rendered: Vec<_> = outcome.findings.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "External Packages: src/c.ts: package '@acme/sdk' is imported (line 1) but not declared in package.json",
                "External Packages: src/a.ts: package 'left-pad' is imported (line 1) but not declared in package.json",
            ]
        );
    }

    #[test]
    fn test_root_config_is_checked_but_builtins_are_not() {
        let ctx = ctx(&[
            ("package.json", FULL_MANIFEST),
            ("vite.config.ts", "import path from 'path';\nimport { VitePWA } from 'vite-plugin-pwa';"),
        ]);
        let outcome = ExternalPackagesRule.evaluate(&ctx);
        assert_eq!(outcome.findings.len(), 1);
        assert_eq!(outcome.findings[0].path.as_deref(), Some("vite.config.ts"));
        assert!(outcome.findings[0].message.contains("'vite-plugin-pwa' is imported (line 2)"));
    }

    #[test]
    fn test_no_manifest_skips() {
        let ctx = ctx(&[("src/a.ts", "import pad from 'left-pad';")]);
        assert!(ExternalPackagesRule.evaluate(&ctx).findings.is_empty());
    }
}
