//! Whole-run tests against fixture trees on disk.

use serde_json::json;
use stagecheck_kernel::{Finding, ProjectConfig, RunReport, Validator};
use stagecheck_testutil::{FIXTURE_ENTITIES, FixtureTree, erd_document};

fn validate(fixture: &FixtureTree) -> RunReport {
    let config = ProjectConfig::load(&fixture.erd_path(), &fixture.openapi_path())
        .expect("schema documents load");
    Validator::default()
        .run(&fixture.root(), config)
        .expect("artifact root exists")
}

fn findings_of<'a>(report: &'a RunReport, rule: &str) -> Vec<&'a Finding> {
    report
        .errors
        .iter()
        .chain(&report.warnings)
        .filter(|f| f.rule == rule)
        .collect()
}

fn messages(findings: &[&Finding]) -> Vec<String> {
    findings.iter().map(|f| f.to_string()).collect()
}

fn rule_passed(report: &RunReport, rule: &str) -> bool {
    report
        .outcomes
        .iter()
        .find(|o| o.rule == rule)
        .unwrap_or_else(|| panic!("rule {rule} not evaluated"))
        .passed()
}

#[test]
fn healthy_project_has_no_findings() {
    for auth in [false, true] {
        let report = validate(&FixtureTree::healthy(auth));
        assert!(report.errors.is_empty(), "auth={auth}: {:#?}", report.errors);
        assert!(report.warnings.is_empty(), "auth={auth}: {:#?}", report.warnings);
        assert!(report.passed());
        assert_eq!(report.exit_code(), 0);
    }
}

#[test]
fn every_rule_reports_an_outcome() {
    let report = validate(&FixtureTree::healthy(false));
    assert_eq!(report.outcomes.len(), Validator::default().registry().len());
    let names: Vec<_> = report.outcomes.iter().map(|o| o.rule.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

#[test]
fn auth_context_required_only_when_enabled() {
    let fixture = FixtureTree::healthy(false);
    assert!(rule_passed(&validate(&fixture), "Auth Context"));

    fixture.write_erd(true, stagecheck_testutil::FIXTURE_ENTITIES);
    let report = validate(&fixture);
    assert!(!rule_passed(&report, "Auth Context"));
    let findings = findings_of(&report, "Auth Context");
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].path.as_deref(), Some("src/context/AuthContext.tsx"));
    assert!(findings[0].message.starts_with("file not found (required because"));
}

#[test]
fn sidebar_required_above_three_entities() {
    let fixture = FixtureTree::healthy(false);
    fixture.write_erd(false, &["Customer", "Order", "Invoice", "Product"]);
    let report = validate(&fixture);
    assert!(!rule_passed(&report, "Sidebar Component"));
    assert!(!rule_passed(&report, "Barrel Exports"));
}

#[test]
fn rendering_is_deterministic() {
    let fixture = FixtureTree::healthy(false);
    fixture.remove("src/App.css");
    fixture.write("src/views/InvoiceView.tsx", "export const InvoiceView = () => null;\n");
    let first = validate(&fixture).render(false);
    let second = validate(&fixture).render(false);
    assert_eq!(first, second);
    assert!(first.contains("VALIDATION FAILED"));
}

#[test]
fn unreadable_file_does_not_hide_other_findings() {
    let fixture = FixtureTree::healthy(false);
    fixture.write_bytes("src/components/Broken.tsx", &[0xff, 0xfe, 0x00, 0xc3]);
    fixture.remove("src/App.css");
    let report = validate(&fixture);

    assert!(
        report
            .errors
            .iter()
            .any(|f| f.path.as_deref() == Some("src/components/Broken.tsx")
                && f.message.starts_with("could not read")),
        "{:#?}",
        report.errors
    );
    assert!(
        report
            .errors
            .iter()
            .any(|f| f.rule == "App.css Styles" && f.message == "file not found")
    );
    assert!(rule_passed(&report, "Route Naming"));
}

#[test]
fn missing_route_constant_is_one_finding_and_fix_clears_it() {
    let fixture = FixtureTree::healthy(false);
    fixture.edit("src/router/routes.ts", "  ORDER_LIST: '/orders',\n", "");
    let report = validate(&fixture);
    let naming = findings_of(&report, "Route Naming");
    assert_eq!(naming.len(), 1, "{naming:#?}");
    assert_eq!(naming[0].path.as_deref(), Some("src/views/OrderView.tsx"));
    assert!(naming[0].message.contains("ORDER"));

    fixture.edit("src/router/routes.ts", "  NOT_FOUND", "  ORDER_VIEW: '/orders',\n  NOT_FOUND");
    let report = validate(&fixture);
    assert!(findings_of(&report, "Route Naming").is_empty());
}

#[test]
fn undeclared_package_is_one_finding() {
    let fixture = FixtureTree::healthy(false);
    fixture.edit(
        "src/views/Home.tsx",
        "import React from 'react';\n",
        "import React from 'react';\nimport leftPad from 'left-pad';\n",
    );
    let report = validate(&fixture);
    let external = findings_of(&report, "External Packages");
    assert_eq!(external.len(), 1);
    assert_eq!(external[0].path.as_deref(), Some("src/views/Home.tsx"));
    assert!(external[0].message.contains("'left-pad'"));
    assert!(external[0].message.contains("(line 2)"));
    assert_eq!(report.errors.len(), 1);
}

#[test]
fn broken_relative_import_names_line_and_specifier() {
    let fixture = FixtureTree::healthy(false);
    fixture.edit(
        "src/views/Home.tsx",
        "import React from 'react';\n",
        "import React from 'react';\nimport { Card } from '../components/Card';\n",
    );
    let report = validate(&fixture);
    let resolution = findings_of(&report, "Import Resolution");
    assert_eq!(resolution.len(), 1);
    assert_eq!(
        resolution[0].message,
        "line 2: import path not found '../components/Card'"
    );
}

#[test]
fn unwired_view_fails_wiring() {
    let fixture = FixtureTree::healthy(false);
    fixture.edit(
        "src/router/index.tsx",
        "        <Route path={ROUTES.ORDER_LIST} element={<OrderView />} />\n",
        "",
    );
    let report = validate(&fixture);
    assert!(!rule_passed(&report, "Route Wiring"));
    assert!(rule_passed(&report, "Route Naming"));
}

#[test]
fn service_endpoint_mismatch_is_reported() {
    let fixture = FixtureTree::healthy(false);
    fixture.edit("src/services/order.service.ts", "api.get('/orders')", "api.get('/order')");
    let report = validate(&fixture);
    let api = findings_of(&report, "Backend API Matching");
    assert_eq!(api.len(), 1, "{api:#?}");
    assert_eq!(api[0].path.as_deref(), Some("src/services/order.service.ts"));
    assert!(api[0].message.contains("'/order'"));
}

#[test]
fn warnings_alone_exit_zero() {
    let fixture = FixtureTree::healthy(false);
    fixture.edit("src/index.css", ":root {", "body.app {");
    fixture.edit(
        "src/main.tsx",
        "  <React.StrictMode>\n    <App />\n  </React.StrictMode>,\n",
        "  <App />,\n",
    );
    fixture.write("src/components/Button.tsx", "export const Button = () => null;\n");

    let report = validate(&fixture);
    assert!(report.errors.is_empty(), "{:#?}", report.errors);
    assert_eq!(report.warnings.len(), 3, "{:#?}", report.warnings);
    assert_eq!(report.exit_code(), 0);
    let text = report.render(false);
    assert!(text.contains("ALL VALIDATIONS PASSED: 0 error(s), 3 warning(s)"));
}

#[test]
fn removed_critical_file_is_reported() {
    let fixture = FixtureTree::healthy(false);
    fixture.remove("src/components/Navbar.tsx");
    let report = validate(&fixture);
    let critical = findings_of(&report, "No Previous Stage Modifications");
    assert_eq!(critical.len(), 1);
    assert_eq!(critical[0].path.as_deref(), Some("src/components/Navbar.tsx"));
    assert!(!rule_passed(&report, "Navbar Component"));
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn incomplete_entity_types_and_services_are_reported() {
    let fixture = FixtureTree::healthy(false);
    fixture.edit(
        "src/types/Order.types.ts",
        "export interface OrderUpdate {\n  customerId?: number;\n}\n",
        "",
    );
    fixture.edit("src/services/order.service.ts", "getById:", "fetchOne:");
    let report = validate(&fixture);

    assert_eq!(
        messages(&findings_of(&report, "Type Definitions")),
        vec!["Type Definitions: src/types/Order.types.ts: missing update DTO 'OrderUpdate'"]
    );
    assert_eq!(
        messages(&findings_of(&report, "Entity Services")),
        vec!["Entity Services: src/services/order.service.ts: missing method 'getById' for operation 'read'"]
    );
    assert_eq!(report.errors.len(), 2, "{:#?}", report.errors);
}

#[test]
fn entity_artifacts_follow_declared_operations() {
    let fixture = FixtureTree::healthy(false);
    let mut erd = erd_document(false, FIXTURE_ENTITIES);
    erd["entities"][1]["operations"] = json!(["list", "read", "update", "delete"]);
    fixture.write_input("input/erd.json", &erd.to_string());
    let report = validate(&fixture);

    assert_eq!(
        messages(&findings_of(&report, "Entity Services")),
        vec![
            "Entity Services: src/services/order.service.ts: missing method 'delete' for operation 'delete'",
            "Entity Services: src/services/order.service.ts: missing method 'update' for operation 'update'",
        ]
    );
    assert!(rule_passed(&report, "Entity Components"));

    fixture.remove("src/components/OrderList.tsx");
    let report = validate(&fixture);
    let components = findings_of(&report, "Entity Components");
    assert_eq!(components.len(), 1);
    assert_eq!(components[0].path.as_deref(), Some("src/components/OrderList.tsx"));
    assert_eq!(components[0].message, "file not found");
}

#[test]
fn project_scaffolding_is_checked() {
    let fixture = FixtureTree::healthy(false);
    fixture.edit("src/services/api.ts", "\nexport default api;\n", "\n");
    fixture.edit("tsconfig.json", "\"jsx\": \"react-jsx\"", "\"jsx\": \"preserve\"");
    fixture.edit(".env", "VITE_API_BASE_URL", "API_SECRET=x\nVITE_API_BASE_URL");
    fixture.remove("src/utils/storage.ts");
    let report = validate(&fixture);

    assert_eq!(
        messages(&findings_of(&report, "API Client")),
        vec!["API Client: src/services/api.ts: missing default export of the client"]
    );
    assert_eq!(
        messages(&findings_of(&report, "TypeScript Config")),
        vec!["TypeScript Config: tsconfig.json: compilerOptions.jsx is 'preserve'; use 'react-jsx'"]
    );
    assert_eq!(
        messages(&findings_of(&report, "Environment Variables")),
        vec!["Environment Variables: .env: 'API_SECRET' is invisible to client code; use the VITE_ prefix"]
    );
    assert!(rule_passed(&report, "Environment Variables"));
    assert_eq!(
        messages(&findings_of(&report, "Storage Utilities")),
        vec!["Storage Utilities: src/utils/storage.ts: file not found"]
    );
    assert!(!rule_passed(&report, "Import Resolution"));
}

#[test]
fn vite_proxy_gaps_are_warnings() {
    let fixture = FixtureTree::healthy(false);
    let config = fixture.read("vite.config.ts");
    let start = config.find("  server: {").expect("server block");
    let end = config.find("});").expect("config end");
    fixture.write("vite.config.ts", &format!("{}{}", &config[..start], &config[end..]));
    let report = validate(&fixture);

    assert!(report.errors.is_empty(), "{:#?}", report.errors);
    assert_eq!(
        messages(&findings_of(&report, "Vite Config")),
        vec![
            "Vite Config: vite.config.ts: dev server should proxy '/api' requests",
            "Vite Config: vite.config.ts: missing dev server proxy configuration",
        ]
    );
}

#[test]
fn commonjs_modules_are_reported() {
    let fixture = FixtureTree::healthy(false);
    fixture.write(
        "src/utils/legacy.js",
        "const path = require('path');\n\nmodule.exports = { path };\n",
    );
    let report = validate(&fixture);
    assert_eq!(
        messages(&findings_of(&report, "ES Modules")),
        vec![
            "ES Modules: src/utils/legacy.js: line 1: CommonJS require(); use an ES import",
            "ES Modules: src/utils/legacy.js: line 3: CommonJS module.exports; use export",
        ]
    );
}
