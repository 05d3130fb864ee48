//! Route naming: every routed view has a constant in the route table.

use super::{Category, Rule, RuleOutcome};
use crate::context::AnalysisContext;
use crate::scanner::{SourceFile, SourceTree};
use crate::syntax::{pattern, strip_comments};

pub(crate) const VIEWS_DIR: &str = "src/views";
pub(crate) const ROUTES_FILE: &str = "src/router/routes.ts";
pub(crate) const ROUTER_FILE: &str = "src/router/index.tsx";

/// Views with a fixed route of their own.
const SPECIAL_VIEWS: &[&str] = &["Home", "NotFound", "index"];

/// View files that need their own route, in path order.
pub(crate) fn routed_views(tree: &SourceTree) -> Vec<&SourceFile> {
    tree.files_in(VIEWS_DIR)
        .filter(|f| f.file_name().ends_with(".tsx"))
        .filter(|f| !f.stem().contains('.') && !SPECIAL_VIEWS.contains(&f.stem()))
        .collect()
}

/// `OrderView` → `Order`. A file named just `View` keeps its name.
pub fn view_base_name(view: &str) -> &str {
    match view.strip_suffix("View") {
        Some(base) if !base.is_empty() => base,
        _ => view,
    }
}

/// `OrderItem` → `ORDER_ITEM`.
pub fn route_constant_name(base: &str) -> String {
    let mut out = String::with_capacity(base.len() + 4);
    let mut prev: Option<char> = None;
    for c in base.chars() {
        if c.is_ascii_uppercase() && prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit()) {
            out.push('_');
        }
        out.push(c.to_ascii_uppercase());
        prev = Some(c);
    }
    out
}

#[derive(Debug, Clone, Copy)]
pub struct RouteNamingRule;

impl Rule for RouteNamingRule {
    fn name(&self) -> &str {
        "Route Naming"
    }

    fn category(&self) -> Category {
        Category::Naming
    }

    fn evaluate(&self, ctx: &AnalysisContext) -> RuleOutcome {
        let mut outcome = RuleOutcome::new(self.name(), self.category());
        let views = routed_views(ctx.tree());
        if views.is_empty() {
            return outcome;
        }

        let Some(routes) = ctx.file(ROUTES_FILE) else {
            outcome.error(Some(ROUTES_FILE), "route table not found; views cannot be routed");
            return outcome;
        };
        let routes = match routes.text() {
            Ok(text) => strip_comments(text),
            Err(e) => {
                outcome.file_error(&e);
                return outcome;
            }
        };

        for view in views {
            let name = view.stem();
            let constant = route_constant_name(view_base_name(name));
            let key = pattern(&format!(r"\b{}(?:_[A-Z0-9_]+)?\s*:", regex::escape(&constant)));
            if !key.is_match(&routes) {
                outcome.error(
                    Some(view.path.as_str()),
                    format!("view '{name}' has no route constant in {ROUTES_FILE} (expected {constant}, {constant}_VIEW or {constant}_*)"),
                );
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;
    use crate::scanner::FileContent;
    use rstest::rstest;

    fn ctx(files: &[(&str, &str)]) -> AnalysisContext {
        let tree = SourceTree::from_files(
            "/p",
            files
                .iter()
                .map(|(p, t)| SourceFile::new(*p, FileContent::Text(t.to_string()))),
        );
        AnalysisContext::new(tree, ProjectConfig::default())
    }

    #[rstest]
    #[case("OrderView", "Order")]
    #[case("OrderItemView", "OrderItem")]
    #[case("Dashboard", "Dashboard")]
    #[case("View", "View")]
    #[case("ViewerView", "Viewer")]
    fn test_view_base_name(#[case] view: &str, #[case] expected: &str) {
        assert_eq!(view_base_name(view), expected);
    }

    #[rstest]
    #[case("Order", "ORDER")]
    #[case("OrderItem", "ORDER_ITEM")]
    #[case("Order2Item", "ORDER2_ITEM")]
    #[case("HTTPLog", "HTTPLOG")]
    #[case("userProfile", "USER_PROFILE")]
    fn test_route_constant_name(#[case] base: &str, #[case] expected: &str) {
        assert_eq!(route_constant_name(base), expected);
    }

    #[test]
    fn test_missing_constant_is_one_finding() {
        let ctx = ctx(&[
            ("src/views/OrderView.tsx", "export const OrderView = () => null;"),
            ("src/views/Home.tsx", ""),
            ("src/router/routes.ts", "export const ROUTES = { HOME: '/', NOT_FOUND: '*' };"),
        ]);
        let outcome = RouteNamingRule.evaluate(&ctx);
        assert_eq!(outcome.findings.len(), 1);
        assert_eq!(outcome.findings[0].path.as_deref(), Some("src/views/OrderView.tsx"));
        assert!(outcome.findings[0].message.contains("ORDER"));
        assert_eq!(outcome.findings[0].category, Category::Naming);
    }

    #[rstest]
    #[case("ORDER: '/orders'")]
    #[case("ORDER_VIEW: '/orders'")]
    #[case("ORDER_LIST: '/orders'")]
    fn test_accepted_constant_forms(#[case] entry: &str) {
        let routes = format!("export const ROUTES = {{ {entry} }};");
        let ctx = ctx(&[
            ("src/views/OrderView.tsx", ""),
            ("src/router/routes.ts", routes.as_str()),
        ]);
        assert!(RouteNamingRule.evaluate(&ctx).findings.is_empty());
    }

    #[test]
    fn test_prefix_of_other_constant_does_not_count() {
        let ctx = ctx(&[
            ("src/views/Order.tsx", ""),
            ("src/router/routes.ts", "export const ROUTES = { PURCHASE_ORDER: '/po' };"),
        ]);
        assert_eq!(RouteNamingRule.evaluate(&ctx).findings.len(), 1);
    }

    #[test]
    fn test_commented_constant_does_not_count() {
        let ctx = ctx(&[
            ("src/views/Order.tsx", ""),
            ("src/router/routes.ts", "export const ROUTES = {\n  // ORDER: '/orders',\n};"),
        ]);
        assert_eq!(RouteNamingRule.evaluate(&ctx).findings.len(), 1);
    }

    #[test]
    fn test_missing_routes_file_is_single_error() {
        let ctx = ctx(&[("src/views/Order.tsx", ""), ("src/views/Customer.tsx", "")]);
        let outcome = RouteNamingRule.evaluate(&ctx);
        assert_eq!(outcome.findings.len(), 1);
        assert_eq!(outcome.findings[0].path.as_deref(), Some(ROUTES_FILE));
    }

    #[test]
    fn test_no_views_passes() {
        assert!(RouteNamingRule.evaluate(&ctx(&[])).findings.is_empty());
    }
}
