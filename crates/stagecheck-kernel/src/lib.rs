//! stagecheck-kernel: structural consistency checks for generated frontend
//! artifact trees.
//!
//! A run goes through five stages:
//!
//! - **Scanner**: reads the artifact tree into memory once
//! - **Syntax**: comment stripping, export forms and references per module
//! - **Resolver**: maps every specifier to a tree file or a declared package
//! - **Rules**: independent checks over the immutable [`AnalysisContext`]
//! - **Report**: sorted, de-duplicated findings and the verdict
//!
//! [`Validator`] wires them together.

pub mod config;
pub mod context;
pub mod error;
pub mod manifest;
pub mod report;
pub mod resolver;
pub mod rules;
pub mod scanner;
pub mod symbols;
pub mod syntax;
pub mod validator;

pub use config::{ApiShape, ProjectConfig, load_api_document};
pub use context::AnalysisContext;
pub use error::{Result, RuleError, ValidatorError};
pub use report::{RunReport, Stats};
pub use rules::{Category, Finding, Rule, RuleOutcome, RuleRegistry, Severity};
pub use scanner::SourceTree;
pub use validator::Validator;
