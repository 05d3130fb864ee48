//! One validation run: scan, analyze, evaluate, fold.

use std::path::Path;

use crate::config::ProjectConfig;
use crate::context::AnalysisContext;
use crate::error::Result;
use crate::report::{RunReport, Stats};
use crate::rules::RuleRegistry;
use crate::scanner::SourceTree;

/// Runs a rule registry against artifact trees.
#[derive(Debug)]
pub struct Validator {
    registry: RuleRegistry,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(RuleRegistry::with_defaults())
    }
}

impl Validator {
    pub fn new(registry: RuleRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Validate the tree at `root`.
    ///
    /// Only a missing root is fatal; every other problem becomes a finding.
    pub fn run(&self, root: &Path, config: ProjectConfig) -> Result<RunReport> {
        tracing::info!(root = %root.display(), rules = self.registry.len(), "validation started");
        let tree = SourceTree::scan(root)?;
        Ok(self.run_tree(tree, config))
    }

    /// Validate an already scanned tree.
    pub fn run_tree(&self, tree: SourceTree, config: ProjectConfig) -> RunReport {
        let ctx = AnalysisContext::new(tree, config);
        let outcomes = self.registry.evaluate(&ctx);
        let report = RunReport::from_outcomes(outcomes, Stats::collect(&ctx));
        tracing::info!(
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            passed = report.passed(),
            "validation finished"
        );
        report
    }
}
