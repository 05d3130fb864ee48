//! Report aggregation and rendering.
//!
//! [`RunReport::from_outcomes`] folds rule outcomes into a sorted,
//! de-duplicated report. [`RunReport::render`] turns it into the text printed
//! on stdout; it is a pure function, so two runs over the same tree render
//! byte-identical reports.

use std::fmt::Write;

use owo_colors::{OwoColorize, Style};

use crate::context::AnalysisContext;
use crate::rules::{Finding, RuleOutcome};

const RULE_WIDTH: usize = 70;

/// Counts shown under VALIDATION STATISTICS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub module_files: usize,
    pub exporting_files: usize,
    pub external_packages: usize,
}

impl Stats {
    pub fn collect(ctx: &AnalysisContext) -> Self {
        Self {
            module_files: ctx.modules().count(),
            exporting_files: ctx.symbols().exporting_files(),
            external_packages: ctx.referenced_packages().len(),
        }
    }
}

/// The folded result of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// One outcome per rule, in rule-name order.
    pub outcomes: Vec<RuleOutcome>,
    /// Error findings sorted by (rule, file, message), de-duplicated.
    pub errors: Vec<Finding>,
    /// Warning findings, same order.
    pub warnings: Vec<Finding>,
    pub stats: Stats,
}

impl RunReport {
    pub fn from_outcomes(mut outcomes: Vec<RuleOutcome>, stats: Stats) -> Self {
        outcomes.sort_by(|a, b| a.rule.cmp(&b.rule));
        let (mut errors, mut warnings): (Vec<Finding>, Vec<Finding>) = outcomes
            .iter()
            .flat_map(|o| o.findings.iter().cloned())
            .partition(Finding::is_error);
        errors.sort();
        errors.dedup();
        warnings.sort();
        warnings.dedup();
        Self {
            outcomes,
            errors,
            warnings,
            stats,
        }
    }

    /// Success iff there are no errors.
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn exit_code(&self) -> u8 {
        if self.passed() { 0 } else { 1 }
    }

    pub fn failed_rules(&self) -> impl Iterator<Item = &RuleOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }

    /// Render the report; `color` enables ANSI styling.
    pub fn render(&self, color: bool) -> String {
        let p = Palette { color };
        let mut out = String::new();

        p.section(&mut out, "VALIDATION SUMMARY");
        for outcome in self.outcomes.iter().filter(|o| o.passed()) {
            p.success(&mut out, &format!("{}: PASSED", outcome.rule));
        }
        for outcome in self.failed_rules() {
            p.error(&mut out, &format!("{}: FAILED", outcome.rule));
        }

        if !self.errors.is_empty() {
            p.section(&mut out, "ERROR DETAILS");
            for (i, finding) in self.errors.iter().enumerate() {
                p.error(&mut out, &format!("{}. {finding}", i + 1));
            }
        }

        if !self.warnings.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", p.paint("WARNINGS:", Style::new().yellow()));
            for (i, finding) in self.warnings.iter().enumerate() {
                p.warning(&mut out, &format!("{}. {finding}", i + 1));
            }
        }

        p.section(&mut out, "VALIDATION STATISTICS");
        p.info(&mut out, &format!("Module files scanned: {}", self.stats.module_files));
        p.info(&mut out, &format!("Files with exports: {}", self.stats.exporting_files));
        p.info(
            &mut out,
            &format!("External packages referenced: {}", self.stats.external_packages),
        );
        p.info(&mut out, &format!("Rules evaluated: {}", self.outcomes.len()));

        let _ = writeln!(out);
        let counts = format!(
            "{} error(s), {} warning(s)",
            self.errors.len(),
            self.warnings.len()
        );
        if self.passed() {
            p.success(&mut out, &format!("ALL VALIDATIONS PASSED: {counts}"));
        } else {
            let failed = self.failed_rules().count();
            p.error(
                &mut out,
                &format!("VALIDATION FAILED: {failed} rule(s) failed, {counts}"),
            );
        }
        out
    }
}

struct Palette {
    color: bool,
}

impl Palette {
    fn paint(&self, text: &str, style: Style) -> String {
        if self.color {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    fn line(&self, out: &mut String, symbol: &str, text: &str, style: Style) {
        let _ = writeln!(out, "{}", self.paint(&format!("{symbol} {text}"), style));
    }

    fn success(&self, out: &mut String, text: &str) {
        self.line(out, "✓", text, Style::new().green());
    }

    fn error(&self, out: &mut String, text: &str) {
        self.line(out, "✗", text, Style::new().red());
    }

    fn warning(&self, out: &mut String, text: &str) {
        self.line(out, "⚠", text, Style::new().yellow());
    }

    fn info(&self, out: &mut String, text: &str) {
        self.line(out, "ℹ", text, Style::new().blue());
    }

    fn section(&self, out: &mut String, title: &str) {
        let bar = "=".repeat(RULE_WIDTH);
        let cyan = Style::new().cyan();
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", self.paint(&bar, cyan));
        let _ = writeln!(out, "{}", self.paint(&format!("  {title}"), cyan));
        let _ = writeln!(out, "{}", self.paint(&bar, cyan));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Category;

    fn outcome(rule: &str, errors: &[(&str, &str)], warnings: &[(&str, &str)]) -> RuleOutcome {
        let mut o = RuleOutcome::new(rule, Category::Presence);
        for (path, msg) in errors {
            o.error(Some(*path), *msg);
        }
        for (path, msg) in warnings {
            o.warning(Some(*path), *msg);
        }
        o
    }

    #[test]
    fn test_fold_sorts_and_dedups() {
        let report = RunReport::from_outcomes(
            vec![
                outcome("Zeta", &[("b.ts", "x"), ("a.ts", "x"), ("a.ts", "x")], &[]),
                outcome("Alpha", &[], &[("c.ts", "w")]),
            ],
            Stats::default(),
        );
        let rules: Vec<_> = report.outcomes.iter().map(|o| o.rule.as_str()).collect();
        assert_eq!(rules, vec!["Alpha", "Zeta"]);
        let paths: Vec<_> = report.errors.iter().map(|f| f.path.as_deref()).collect();
        assert_eq!(paths, vec![Some("a.ts"), Some("b.ts")]);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_warnings_only_passes() {
        let report = RunReport::from_outcomes(
            vec![outcome("A", &[], &[("a", "1"), ("b", "2"), ("c", "3")])],
            Stats::default(),
        );
        assert!(report.passed());
        assert_eq!(report.exit_code(), 0);
        let text = report.render(false);
        assert!(text.contains("✓ A: PASSED"));
        assert!(text.contains("WARNINGS:\n⚠ 1. A: a: 1\n"));
        assert!(text.ends_with("✓ ALL VALIDATIONS PASSED: 0 error(s), 3 warning(s)\n"));
        assert!(!text.contains("ERROR DETAILS"));
    }

    #[test]
    fn test_render_failed() {
        let report = RunReport::from_outcomes(
            vec![
                outcome("Route Naming", &[("src/views/OrderView.tsx", "no constant")], &[]),
                outcome("App Component", &[], &[]),
            ],
            Stats {
                module_files: 4,
                exporting_files: 3,
                external_packages: 2,
            },
        );
        let text = report.render(false);
        let summary = text.find("✓ App Component: PASSED").unwrap();
        let failed = text.find("✗ Route Naming: FAILED").unwrap();
        assert!(summary < failed);
        assert!(text.contains("✗ 1. Route Naming: src/views/OrderView.tsx: no constant"));
        assert!(text.contains("ℹ Module files scanned: 4"));
        assert!(text.ends_with("✗ VALIDATION FAILED: 1 rule(s) failed, 1 error(s), 0 warning(s)\n"));
    }

    #[test]
    fn test_render_is_deterministic_and_plain_without_color() {
        let report = RunReport::from_outcomes(vec![outcome("A", &[("a", "e")], &[])], Stats::default());
        assert_eq!(report.render(false), report.render(false));
        assert!(!report.render(false).contains('\u{1b}'));
        assert!(report.render(true).contains('\u{1b}'));
    }
}
