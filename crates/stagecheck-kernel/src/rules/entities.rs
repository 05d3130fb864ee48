//! Per-entity artifacts.
//!
//! Every ERD entity gets a type module; entities that declare operations also
//! get a service object with one method per operation, a list component when
//! they can be listed and a form component when they can be created or
//! updated. File paths derive from the entity name, so these rules walk
//! [`ProjectConfig::entities`] instead of a static table.

use std::sync::LazyLock;

use regex::Regex;

use super::{Category, Rule, RuleOutcome};
use crate::config::ProjectConfig;
use crate::context::AnalysisContext;
use crate::syntax::{line_of, pattern, strip_comments};

pub const TYPES_DIR: &str = "src/types";
pub const COMPONENTS_DIR: &str = "src/components";

/// Service method generated for each ERD operation.
pub const OPERATION_METHODS: &[(&str, &str)] = &[
    ("list", "getAll"),
    ("read", "getById"),
    ("create", "create"),
    ("update", "update"),
    ("delete", "delete"),
];

/// `OrderItem` → `orderItem`
pub fn camel_case(entity: &str) -> String {
    let mut chars = entity.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn type_file(entity: &str) -> String {
    format!("{TYPES_DIR}/{entity}.types.ts")
}

pub fn service_file(entity: &str) -> String {
    format!("src/services/{}.service.ts", camel_case(entity))
}

/// Comment-stripped text of `path`, or the finding that explains why there
/// is none.
fn module_text(ctx: &AnalysisContext, path: &str, outcome: &mut RuleOutcome) -> Option<String> {
    let Some(file) = ctx.file(path) else {
        outcome.error(Some(path), "file not found");
        return None;
    };
    match file.text() {
        Ok(text) => Some(strip_comments(text)),
        Err(e) => {
            outcome.file_error(&e);
            None
        }
    }
}

fn interface(name: &str) -> Regex {
    pattern(&format!(r"export\s+interface\s+{}\b[^{{;]*\{{", regex::escape(name)))
}

/// `src/types/<Entity>.types.ts` declares the entity and its DTOs.
#[derive(Debug, Clone, Copy)]
pub struct EntityTypesRule;

impl Rule for EntityTypesRule {
    fn name(&self) -> &str {
        "Type Definitions"
    }

    fn category(&self) -> Category {
        Category::Presence
    }

    fn evaluate(&self, ctx: &AnalysisContext) -> RuleOutcome {
        let mut outcome = RuleOutcome::new(self.name(), self.category());
        for entity in &ctx.config().entities {
            let path = type_file(entity);
            let Some(text) = module_text(ctx, &path, &mut outcome) else {
                continue;
            };
            let required = [
                (entity.clone(), "base interface"),
                (format!("{entity}Create"), "create DTO"),
                (format!("{entity}Update"), "update DTO"),
            ];
            for (name, what) in required {
                if !interface(&name).is_match(&text) {
                    outcome.error(Some(path.as_str()), format!("missing {what} '{name}'"));
                }
            }
            let response = format!("{entity}Response");
            if !interface(&response).is_match(&text) {
                outcome.warning(
                    Some(path.as_str()),
                    format!("missing response interface '{response}'"),
                );
            }
        }
        outcome
    }
}

static TYPES_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| pattern(r#"import\b[^;]*?from\s*['"][^'"]*types['"]"#));
static CLIENT_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| pattern(r#"import\b[^;]*?\bapi\b[^;]*?from\s*['"][^'"]*api['"]"#));

/// `src/services/<entity>.service.ts` exports `<entity>Service` with one
/// method per declared operation.
#[derive(Debug, Clone, Copy)]
pub struct EntityServicesRule;

impl Rule for EntityServicesRule {
    fn name(&self) -> &str {
        "Entity Services"
    }

    fn category(&self) -> Category {
        Category::Presence
    }

    fn evaluate(&self, ctx: &AnalysisContext) -> RuleOutcome {
        let mut outcome = RuleOutcome::new(self.name(), self.category());
        let config = ctx.config();
        for entity in config.entities.iter().filter(|e| !config.operations_of(e).is_empty()) {
            let path = service_file(entity);
            let Some(text) = module_text(ctx, &path, &mut outcome) else {
                continue;
            };
            check_service(config, entity, &path, &text, &mut outcome);
        }
        outcome
    }
}

fn check_service(
    config: &ProjectConfig,
    entity: &str,
    path: &str,
    text: &str,
    outcome: &mut RuleOutcome,
) {
    let object = format!("{}Service", camel_case(entity));
    if !pattern(&format!(r"export\s+const\s+{}\s*[:=]", regex::escape(&object))).is_match(text) {
        outcome.error(Some(path), format!("missing service export '{object}'"));
    }

    for operation in config.operations_of(entity) {
        let Some((_, method)) = OPERATION_METHODS.iter().find(|(op, _)| *op == operation.as_str()) else {
            continue;
        };
        if !pattern(&format!(r"\b{method}\s*[:(]")).is_match(text) {
            outcome.error(
                Some(path),
                format!("missing method '{method}' for operation '{operation}'"),
            );
        }
    }

    if !CLIENT_IMPORT.is_match(text) {
        outcome.error(Some(path), "missing api client import");
    }
    if !TYPES_IMPORT.is_match(text) {
        outcome.warning(Some(path), "should import its entity types from the types module");
    }
}

static COMPONENT_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"React\.FC\b|function\s+\w+|const\s+\w+.*=>"));
static FORM_ELEMENT: LazyLock<Regex> = LazyLock::new(|| pattern(r"<form\b"));

/// `<Entity>List.tsx` for listable entities, `<Entity>Form.tsx` for entities
/// that can be created or updated.
#[derive(Debug, Clone, Copy)]
pub struct EntityComponentsRule;

impl Rule for EntityComponentsRule {
    fn name(&self) -> &str {
        "Entity Components"
    }

    fn category(&self) -> Category {
        Category::Presence
    }

    fn evaluate(&self, ctx: &AnalysisContext) -> RuleOutcome {
        let mut outcome = RuleOutcome::new(self.name(), self.category());
        let config = ctx.config();
        for entity in &config.entities {
            if config.has_operation(entity, "list") {
                let path = format!("{COMPONENTS_DIR}/{entity}List.tsx");
                if let Some(text) = module_text(ctx, &path, &mut outcome) {
                    check_list(entity, &path, &text, &mut outcome);
                }
            }
            if config.has_operation(entity, "create") || config.has_operation(entity, "update") {
                let path = format!("{COMPONENTS_DIR}/{entity}Form.tsx");
                if let Some(text) = module_text(ctx, &path, &mut outcome) {
                    check_form(entity, &path, &text, &mut outcome);
                }
            }
        }
        outcome
    }
}

fn check_list(entity: &str, path: &str, text: &str, outcome: &mut RuleOutcome) {
    if !COMPONENT_SHAPE.is_match(text) {
        outcome.error(Some(path), "not a React component (no React.FC, function or arrow component)");
    }
    let entity_import = pattern(&format!(r"import\b[^;]*?\b{}\b[^;]*?from", regex::escape(entity)));
    if !entity_import.is_match(text) {
        outcome.warning(Some(path), format!("should import the '{entity}' type"));
    }
}

fn check_form(entity: &str, path: &str, text: &str, outcome: &mut RuleOutcome) {
    if !COMPONENT_SHAPE.is_match(text) {
        outcome.error(Some(path), "not a React component (no React.FC, function or arrow component)");
    }
    if !FORM_ELEMENT.is_match(text) {
        outcome.warning(Some(path), "no <form> element");
    }
    let dto_import = pattern(&format!(
        r"import\b[^;]*?\b{}(?:Create|Update)\b[^;]*?from",
        regex::escape(entity)
    ));
    if !dto_import.is_match(text) {
        outcome.warning(
            Some(path),
            format!("should import '{entity}Create' or '{entity}Update'"),
        );
    }
}

static REQUIRE_CALL: LazyLock<Regex> = LazyLock::new(|| pattern(r"=\s*require\s*\("));
static MODULE_EXPORTS: LazyLock<Regex> = LazyLock::new(|| pattern(r"\bmodule\.exports\s*="));

/// Modules under `src/` use ES module syntax.
#[derive(Debug, Clone, Copy)]
pub struct EsModulesRule;

impl Rule for EsModulesRule {
    fn name(&self) -> &str {
        "ES Modules"
    }

    fn category(&self) -> Category {
        Category::Resolution
    }

    fn evaluate(&self, ctx: &AnalysisContext) -> RuleOutcome {
        let mut outcome = RuleOutcome::new(self.name(), self.category());
        for (file, _) in ctx.modules().filter(|(f, _)| f.path.starts_with("src/")) {
            let text = match file.text() {
                Ok(text) => strip_comments(text),
                Err(e) => {
                    outcome.file_error(&e);
                    continue;
                }
            };
            if let Some(m) = REQUIRE_CALL.find(&text) {
                outcome.error(
                    Some(file.path.as_str()),
                    format!("line {}: CommonJS require(); use an ES import", line_of(&text, m.start())),
                );
            }
            if let Some(m) = MODULE_EXPORTS.find(&text) {
                outcome.error(
                    Some(file.path.as_str()),
                    format!("line {}: CommonJS module.exports; use export", line_of(&text, m.start())),
                );
            }
        }
        outcome
    }
}
