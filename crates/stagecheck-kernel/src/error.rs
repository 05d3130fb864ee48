//! Error types for stagecheck.
//!
//! Two tiers, never mixed:
//!
//! - [`ValidatorError`] is fatal. It is returned before any rule runs (schema
//!   documents missing or unparsable, artifact root missing) and no report is
//!   produced.
//! - [`RuleError`] is local to one file inside one rule. Rules convert it into
//!   a [`Finding`](crate::rules::Finding) and keep going.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal-input failures that abort a run before any rule is evaluated.
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// A schema document does not exist.
    #[error("{kind} file not found: {}", path.display())]
    SchemaMissing {
        /// Which document ("ERD", "OpenAPI").
        kind: &'static str,
        path: PathBuf,
    },

    /// A schema document exists but could not be parsed.
    #[error("failed to parse {kind} file {}: {reason}", path.display())]
    SchemaParse {
        kind: &'static str,
        path: PathBuf,
        reason: String,
    },

    /// The artifact tree root does not exist or is not a directory.
    #[error("artifact root not found: {}", .0.display())]
    RootMissing(PathBuf),

    /// IO error outside per-file handling (e.g. reading a schema document).
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// A failure confined to one file while a rule inspects it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleError {
    /// The file was scanned but its content is not available as text.
    #[error("could not read {path}: {reason}")]
    Unreadable { path: String, reason: String },

    /// The dependency manifest exists but is not a valid manifest.
    #[error("invalid manifest {path}: {reason}")]
    Manifest { path: String, reason: String },
}

/// Result alias for fatal operations.
pub type Result<T> = std::result::Result<T, ValidatorError>;
