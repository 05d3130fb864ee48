//! Wiring rules: views reach the router, barrels re-export their directory.

use std::collections::BTreeSet;

use super::naming::{ROUTER_FILE, VIEWS_DIR, routed_views};
use super::{Category, Rule, RuleOutcome};
use crate::config::ProjectConfig;
use crate::context::AnalysisContext;
use crate::scanner::FileCategory;
use crate::syntax::{ExportForm, ReferenceKind, pattern, strip_comments};

/// Every routed view is imported by the router and rendered by a `<Route>`.
#[derive(Debug, Clone, Copy)]
pub struct RouteWiringRule;

impl Rule for RouteWiringRule {
    fn name(&self) -> &str {
        "Route Wiring"
    }

    fn category(&self) -> Category {
        Category::Wiring
    }

    fn evaluate(&self, ctx: &AnalysisContext) -> RuleOutcome {
        let mut outcome = RuleOutcome::new(self.name(), self.category());
        let views = routed_views(ctx.tree());
        if views.is_empty() {
            return outcome;
        }

        let Some(router) = ctx.file(ROUTER_FILE) else {
            outcome.error(Some(ROUTER_FILE), "router not found; views cannot be wired");
            return outcome;
        };
        let text = match router.text() {
            Ok(text) => strip_comments(text),
            Err(e) => {
                outcome.file_error(&e);
                return outcome;
            }
        };
        let references = ctx
            .symbols()
            .get(ROUTER_FILE)
            .map(|s| s.references.as_slice())
            .unwrap_or_default();

        for view in views {
            let name = view.stem();
            let imported = references
                .iter()
                .filter(|r| r.specifier.contains("views"))
                .any(|r| match &r.kind {
                    ReferenceKind::Grouped { names } => names.iter().any(|n| n == name),
                    ReferenceKind::Single { binding } => binding == name,
                    _ => false,
                });
            if !imported {
                outcome.error(
                    Some(view.path.as_str()),
                    format!("view '{name}' is not imported in {ROUTER_FILE} from a views module"),
                );
            }

            let usage = pattern(&format!(
                r"<Route\b[^>]*?\belement=\{{[^}}]*?<{}\b",
                regex::escape(name)
            ));
            if !usage.is_match(&text) {
                outcome.error(
                    Some(view.path.as_str()),
                    format!("view '{name}' is not rendered by any <Route element> in {ROUTER_FILE}"),
                );
            }
        }
        outcome
    }
}

/// A barrel file and the members it must re-export.
struct Barrel {
    dir: &'static str,
    active: fn(&ProjectConfig, &AnalysisContext) -> bool,
    required: fn(&ProjectConfig) -> Vec<String>,
}

impl Barrel {
    fn index(&self) -> String {
        format!("{}/index.ts", self.dir)
    }
}

fn always(_: &ProjectConfig, _: &AnalysisContext) -> bool {
    true
}

fn context_present(config: &ProjectConfig, ctx: &AnalysisContext) -> bool {
    config.auth_enabled && ctx.tree().has_dir("src/context")
}

fn types_present(_: &ProjectConfig, ctx: &AnalysisContext) -> bool {
    ctx.tree().has_dir("src/types")
}

fn utils_present(_: &ProjectConfig, ctx: &AnalysisContext) -> bool {
    ctx.tree().has_dir("src/utils")
}

fn hooks_present(_: &ProjectConfig, ctx: &AnalysisContext) -> bool {
    ctx.tree().has_dir("src/hooks")
}

fn members(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn view_members(_: &ProjectConfig) -> Vec<String> {
    members(&["Home", "NotFound"])
}

fn component_members(config: &ProjectConfig) -> Vec<String> {
    let mut members = members(&["Layout", "Navbar"]);
    if config.needs_sidebar() {
        members.push("Sidebar".to_string());
    }
    members
}

fn context_members(_: &ProjectConfig) -> Vec<String> {
    members(&["AuthContext"])
}

fn type_members(config: &ProjectConfig) -> Vec<String> {
    config.entities.iter().map(|e| format!("{e}.types")).collect()
}

fn util_members(_: &ProjectConfig) -> Vec<String> {
    members(&["formatting", "storage"])
}

fn hook_members(_: &ProjectConfig) -> Vec<String> {
    members(&["useApi", "usePagination"])
}

const BARRELS: &[Barrel] = &[
    Barrel {
        dir: VIEWS_DIR,
        active: always,
        required: view_members,
    },
    Barrel {
        dir: "src/components",
        active: always,
        required: component_members,
    },
    Barrel {
        dir: "src/context",
        active: context_present,
        required: context_members,
    },
    Barrel {
        dir: "src/types",
        active: types_present,
        required: type_members,
    },
    Barrel {
        dir: "src/utils",
        active: utils_present,
        required: util_members,
    },
    Barrel {
        dir: "src/hooks",
        active: hooks_present,
        required: hook_members,
    },
];

/// `./Layout.tsx` → `Layout`; anything not a sibling gives `None`.
fn sibling_member(source: &str) -> Option<&str> {
    let name = source.strip_prefix("./")?;
    if name.contains('/') {
        return None;
    }
    Some(
        [".tsx", ".ts", ".jsx", ".js"]
            .iter()
            .find_map(|ext| name.strip_suffix(ext))
            .unwrap_or(name),
    )
}

/// Barrels re-export the required members and every other module in their
/// directory.
#[derive(Debug, Clone, Copy)]
pub struct BarrelExportsRule;

impl Rule for BarrelExportsRule {
    fn name(&self) -> &str {
        "Barrel Exports"
    }

    fn category(&self) -> Category {
        Category::Wiring
    }

    fn evaluate(&self, ctx: &AnalysisContext) -> RuleOutcome {
        let mut outcome = RuleOutcome::new(self.name(), self.category());
        let config = ctx.config();

        for barrel in BARRELS {
            if !(barrel.active)(config, ctx) {
                continue;
            }
            let index = barrel.index();
            let Some(file) = ctx.file(&index) else {
                outcome.error(Some(index.as_str()), "barrel file not found");
                continue;
            };
            if let Err(e) = file.text() {
                outcome.file_error(&e);
                continue;
            }

            let reexported: BTreeSet<&str> = ctx
                .symbols()
                .get(&index)
                .map(|s| s.forms.as_slice())
                .unwrap_or_default()
                .iter()
                .filter_map(|form| match form {
                    ExportForm::Wildcard { source, .. }
                    | ExportForm::NamespaceReexport { source, .. }
                    | ExportForm::List {
                        source: Some(source),
                        ..
                    } => sibling_member(source),
                    _ => None,
                })
                .collect();

            let required = (barrel.required)(config);
            for member in &required {
                if !reexported.contains(member.as_str()) {
                    outcome.error(
                        Some(index.as_str()),
                        format!("missing re-export of '{member}' (expected export * from './{member}')"),
                    );
                }
            }

            let derived = ctx
                .tree()
                .files_in(barrel.dir)
                .filter(|f| f.category == FileCategory::Module)
                .map(|f| f.stem())
                .filter(|stem| *stem != "index" && !stem.contains('.'))
                .filter(|stem| !required.iter().any(|r| r == stem) && !reexported.contains(stem));
            for member in derived {
                outcome.warning(
                    Some(index.as_str()),
                    format!("'{member}' in {} is not re-exported by the barrel", barrel.dir),
                );
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{FileContent, SourceFile, SourceTree};
    use rstest::rstest;

    fn ctx_with(files: &[(&str, &str)], config: ProjectConfig) -> AnalysisContext {
        let tree = SourceTree::from_files(
            "/p",
            files
                .iter()
                .map(|(p, t)| SourceFile::new(*p, FileContent::Text(t.to_string()))),
        );
        AnalysisContext::new(tree, config)
    }

    fn ctx(files: &[(&str, &str)]) -> AnalysisContext {
        ctx_with(files, ProjectConfig::default())
    }

    const WIRED_ROUTER: &str = "import { BrowserRouter, Routes, Route } from 'react-router-dom';
import { Home, NotFound, OrderView } from '../views';
export const AppRouter = () => (
  <BrowserRouter>
    <Routes>
      <Route path={ROUTES.ORDER} element={<OrderView />} />
    </Routes>
  </BrowserRouter>
);";

    #[test]
    fn test_wired_view_passes() {
        let ctx = ctx(&[
            ("src/views/OrderView.tsx", ""),
            (ROUTER_FILE, WIRED_ROUTER),
        ]);
        assert!(RouteWiringRule.evaluate(&ctx).findings.is_empty());
    }

    #[test]
    fn test_default_import_from_views_counts() {
        let router = "import OrderView from '../views/OrderView';\n<Route path='/o' element={<OrderView />} />";
        let ctx = ctx(&[("src/views/OrderView.tsx", ""), (ROUTER_FILE, router)]);
        assert!(RouteWiringRule.evaluate(&ctx).findings.is_empty());
    }

    #[test]
    fn test_unwired_view_reports_import_and_usage() {
        let ctx = ctx(&[
            ("src/views/OrderView.tsx", ""),
            ("src/views/CustomerView.tsx", ""),
            (ROUTER_FILE, WIRED_ROUTER),
        ]);
        let outcome = RouteWiringRule.evaluate(&ctx);
        assert_eq!(outcome.findings.len(), 2);
        assert!(
            outcome
                .findings
                .iter()
                .all(|f| f.path.as_deref() == Some("src/views/CustomerView.tsx"))
        );
    }

    #[test]
    fn test_import_from_other_module_does_not_count() {
        let router = "import { OrderView } from '../pages';\n<Route path='/o' element={<OrderView />} />";
        let ctx = ctx(&[("src/views/OrderView.tsx", ""), (ROUTER_FILE, router)]);
        let outcome = RouteWiringRule.evaluate(&ctx);
        assert_eq!(outcome.findings.len(), 1);
        assert!(outcome.findings[0].message.contains("not imported"));
    }

    #[test]
    fn test_missing_router_is_single_error() {
        let ctx = ctx(&[("src/views/A.tsx", ""), ("src/views/B.tsx", "")]);
        let outcome = RouteWiringRule.evaluate(&ctx);
        assert_eq!(outcome.findings.len(), 1);
        assert_eq!(outcome.findings[0].path.as_deref(), Some(ROUTER_FILE));
    }

    #[rstest]
    #[case("./Layout", Some("Layout"))]
    #[case("./Layout.tsx", Some("Layout"))]
    #[case("../Layout", None)]
    #[case("./nested/Layout", None)]
    fn test_sibling_member(#[case] source: &str, #[case] expected: Option<&str>) {
        assert_eq!(sibling_member(source), expected);
    }

    #[test]
    fn test_barrels_complete() {
        let ctx = ctx(&[
            ("src/views/index.ts", "export * from './Home';\nexport { NotFound } from './NotFound';"),
            ("src/views/Home.tsx", ""),
            ("src/views/NotFound.tsx", ""),
            ("src/components/index.ts", "export * from './Layout';\nexport * from './Navbar';"),
            ("src/components/Layout.tsx", ""),
            ("src/components/Navbar.tsx", ""),
        ]);
        assert!(BarrelExportsRule.evaluate(&ctx).findings.is_empty());
    }

    #[test]
    fn test_required_missing_is_error_derived_missing_is_warning() {
        let ctx = ctx(&[
            ("src/views/index.ts", "export * from './Home';\nexport * from './NotFound';"),
            ("src/components/index.ts", "export * from './Layout';"),
            ("src/components/Navbar.tsx", ""),
            ("src/components/Button.tsx", ""),
            ("src/components/Button.test.tsx", ""),
        ]);
        let outcome = BarrelExportsRule.evaluate(&ctx);
        let errors: Vec<_> = outcome.findings.iter().filter(|f| f.is_error()).collect();
        let warnings: Vec<_> = outcome.findings.iter().filter(|f| !f.is_error()).collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("'Navbar'"));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("'Button'"));
    }

    #[test]
    fn test_sidebar_and_context_are_conditional() {
        let config = ProjectConfig {
            auth_enabled: true,
            entities: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            ..ProjectConfig::default()
        };
        let files = [
            ("src/views/index.ts", "export * from './Home';\nexport * from './NotFound';"),
            ("src/components/index.ts", "export * from './Layout';\nexport * from './Navbar';"),
            ("src/context/AuthContext.tsx", ""),
        ];
        let outcome = BarrelExportsRule.evaluate(&ctx_with(&files, config));
        let messages: Vec<_> = outcome.findings.iter().map(|f| f.to_string()).collect();
        assert_eq!(outcome.findings.len(), 2, "{messages:?}");
        assert!(messages.iter().any(|m| m.contains("'Sidebar'")));
        assert!(messages.iter().any(|m| m.contains("src/context/index.ts")));
    }

    #[test]
    fn test_types_utils_and_hooks_barrels_once_present() {
        let config = ProjectConfig {
            entities: vec!["Customer".into(), "Order".into()],
            ..ProjectConfig::default()
        };
        let files = [
            ("src/views/index.ts", "export * from './Home';\nexport * from './NotFound';"),
            ("src/components/index.ts", "export * from './Layout';\nexport * from './Navbar';"),
            ("src/types/index.ts", "export * from './Customer.types';"),
            ("src/types/Customer.types.ts", ""),
            ("src/hooks/index.ts", "export * from './useApi';\nexport { default as usePagination } from './usePagination';"),
            ("src/utils/formatting.ts", ""),
        ];
        let outcome = BarrelExportsRule.evaluate(&ctx_with(&files, config));
        let messages: Vec<_> = outcome.findings.iter().map(|f| f.to_string()).collect();
        assert_eq!(
            messages,
            vec![
                "Barrel Exports: src/types/index.ts: missing re-export of 'Order.types' (expected export * from './Order.types')",
                "Barrel Exports: src/utils/index.ts: barrel file not found",
            ]
        );
    }
}
