//! stagecheck: validate a generated frontend artifact tree.
//!
//! ```bash
//! stagecheck input/erd.json input/openapi.json --root generated_project
//! ```
//!
//! The report goes to stdout, logs (`RUST_LOG`) to stderr. Exit status is 0
//! when no rule reports an error and 1 otherwise, including when a schema
//! document or the artifact root is missing.

use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use stagecheck_kernel::{ProjectConfig, Validator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    fn enabled(self) -> bool {
        match self {
            Self::Auto => std::io::stdout().is_terminal(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "stagecheck", version, about = "Structural consistency validator for generated frontend projects")]
struct Args {
    /// ERD schema document (JSON)
    erd: PathBuf,

    /// API document (OpenAPI JSON or YAML)
    openapi: PathBuf,

    /// Artifact root to validate
    #[arg(long, env = "STAGECHECK_ROOT", default_value = "generated_project")]
    root: PathBuf,

    /// Colorize the report
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("stagecheck: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<u8> {
    tracing::debug!(
        erd = %args.erd.display(),
        openapi = %args.openapi.display(),
        root = %args.root.display(),
        "stagecheck starting"
    );
    let config = ProjectConfig::load(&args.erd, &args.openapi)
        .context("failed to load schema documents")?;
    let report = Validator::default()
        .run(&args.root, config)
        .with_context(|| format!("failed to validate {}", args.root.display()))?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(report.render(args.color.enabled()).as_bytes())
        .context("failed to write report")?;
    stdout.flush().context("failed to write report")?;
    Ok(report.exit_code())
}
