//! The rule engine.
//!
//! Every structural contract is a [`Rule`]: a named, independent check that
//! reads the [`AnalysisContext`] and returns a [`RuleOutcome`]. Rules are
//! registered in a [`RuleRegistry`] and evaluated in name order.
//!
//! # Findings
//!
//! - **Errors** make the rule fail and the run fail.
//! - **Warnings** are advisory and never affect the verdict.
//!
//! A problem confined to one file (unreadable content, broken manifest) is
//! reported as a finding naming that file; the rule keeps going.

mod api;
mod entities;
mod manifest;
mod naming;
mod presence;
mod resolution;
mod wiring;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::context::AnalysisContext;
use crate::error::RuleError;

pub use api::BackendApiRule;
pub use entities::{EntityComponentsRule, EntityServicesRule, EntityTypesRule, EsModulesRule};
pub use manifest::{ExternalPackagesRule, PackageManifestRule};
pub use naming::{RouteNamingRule, route_constant_name, view_base_name};
pub use presence::{CRITICAL_FILES, CriticalFilesRule, Marker, PresenceRule, RequiredFile, presence_catalogue};
pub use resolution::{ExportConsistencyRule, ImportResolutionRule};
pub use wiring::{BarrelExportsRule, RouteWiringRule};

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Fails the rule and the run.
    Error,
    /// Advisory only.
    Warning,
}

/// What kind of contract a finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Presence,
    Naming,
    Wiring,
    Manifest,
    Resolution,
    Ambiguity,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Presence => "presence",
            Self::Naming => "naming",
            Self::Wiring => "wiring",
            Self::Manifest => "manifest",
            Self::Resolution => "resolution",
            Self::Ambiguity => "ambiguity",
        };
        f.write_str(name)
    }
}

/// One observation made by one rule.
///
/// Field order is the sort order: rule, file, message.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Finding {
    pub rule: String,
    pub path: Option<String>,
    pub message: String,
    pub severity: Severity,
    pub category: Category,
}

impl Finding {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {}: {}", self.rule, path, self.message),
            None => write!(f, "{}: {}", self.rule, self.message),
        }
    }
}

/// The findings of one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub rule: String,
    pub category: Category,
    pub findings: Vec<Finding>,
}

impl RuleOutcome {
    pub fn new(rule: impl Into<String>, category: Category) -> Self {
        Self {
            rule: rule.into(),
            category,
            findings: Vec::new(),
        }
    }

    /// Passed iff no error-severity finding.
    pub fn passed(&self) -> bool {
        !self.findings.iter().any(Finding::is_error)
    }

    pub fn error(&mut self, path: Option<&str>, message: impl Into<String>) {
        self.push(Severity::Error, self.category, path, message.into());
    }

    pub fn warning(&mut self, path: Option<&str>, message: impl Into<String>) {
        self.push(Severity::Warning, self.category, path, message.into());
    }

    /// Error with a category other than the rule's own.
    pub fn error_in(&mut self, category: Category, path: Option<&str>, message: impl Into<String>) {
        self.push(Severity::Error, category, path, message.into());
    }

    /// Report a per-file failure as an error naming the file.
    pub fn file_error(&mut self, err: &RuleError) {
        let path = match err {
            RuleError::Unreadable { path, .. } | RuleError::Manifest { path, .. } => path.clone(),
        };
        self.push(Severity::Error, self.category, Some(path.as_str()), err.to_string());
    }

    fn push(&mut self, severity: Severity, category: Category, path: Option<&str>, message: String) {
        self.findings.push(Finding {
            rule: self.rule.clone(),
            path: path.map(str::to_string),
            message,
            severity,
            category,
        });
    }
}

/// A structural check over the analysis context.
pub trait Rule: Send + Sync {
    /// Unique rule name; also the report label.
    fn name(&self) -> &str;

    /// Category of the rule's findings.
    fn category(&self) -> Category;

    fn evaluate(&self, ctx: &AnalysisContext) -> RuleOutcome;
}

/// Registry of rules, evaluated in name order.
#[derive(Default)]
pub struct RuleRegistry {
    rules: HashMap<String, Arc<dyn Rule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full default catalogue.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for rule in presence_catalogue() {
            registry.register_arc(rule);
        }
        registry.register(EntityTypesRule);
        registry.register(EntityServicesRule);
        registry.register(EntityComponentsRule);
        registry.register(EsModulesRule);
        registry.register(RouteNamingRule);
        registry.register(RouteWiringRule);
        registry.register(BarrelExportsRule);
        registry.register(BackendApiRule);
        registry.register(PackageManifestRule);
        registry.register(ExternalPackagesRule);
        registry.register(ImportResolutionRule);
        registry.register(ExportConsistencyRule);
        registry
    }

    /// Register a rule, replacing any rule of the same name.
    pub fn register(&mut self, rule: impl Rule + 'static) {
        let name = rule.name().to_string();
        self.rules.insert(name, Arc::new(rule));
    }

    pub fn register_arc(&mut self, rule: Arc<dyn Rule>) {
        let name = rule.name().to_string();
        self.rules.insert(name, rule);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Rule>> {
        self.rules.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Rule names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.rules.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate every rule against `ctx`, in name order.
    pub fn evaluate(&self, ctx: &AnalysisContext) -> Vec<RuleOutcome> {
        self.names()
            .into_iter()
            .filter_map(|name| self.rules.get(name))
            .map(|rule| {
                let outcome = rule.evaluate(ctx);
                tracing::debug!(
                    rule = rule.name(),
                    findings = outcome.findings.len(),
                    passed = outcome.passed(),
                    "rule evaluated"
                );
                outcome
            })
            .collect()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.names())
            .finish()
    }
}
