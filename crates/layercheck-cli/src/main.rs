//! Layercheck CLI
//!
//! Command-line interface for drawing layer validation and comparison

use std::error::Error;
use std::time::Instant;

use clap::{Parser, Subcommand};
use layercheck_core::logging_facility::{init, Profile};
use layercheck_core::{log_op_end, log_op_error, log_op_start, ExError, LayerCheckError};
use layercheck_core_types::RunId;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "layercheck")]
#[command(about = "Layercheck - Drawing layer compliance checks", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate a parsed drawing against a rule file
    Validate(commands::validate::ValidateArgs),
    /// Reduce a parsed drawing to per-layer snapshots
    Snapshot(commands::snapshot::SnapshotArgs),
    /// Compare two snapshot files
    Compare(commands::compare::CompareArgs),
}

impl Commands {
    fn op_name(&self) -> &'static str {
        match self {
            Commands::Validate(_) => "cli_validate",
            Commands::Snapshot(_) => "cli_snapshot",
            Commands::Compare(_) => "cli_compare",
        }
    }
}

/// Map a command failure onto the structured error taxonomy for logging
fn classify(err: &(dyn Error + 'static)) -> ExError {
    if let Some(ex) = err.downcast_ref::<ExError>() {
        return ex.clone();
    }
    if let Some(e) = err.downcast_ref::<LayerCheckError>() {
        return e.clone().into();
    }
    if let Some(e) = err.downcast_ref::<serde_json::Error>() {
        return LayerCheckError::Serialization { message: e.to_string() }.into();
    }
    LayerCheckError::Internal { message: err.to_string() }.into()
}

fn main() {
    let cli = Cli::parse();

    init(if cli.log_json {
        Profile::Production
    } else {
        Profile::Development
    });
    let run_id = RunId::new();
    let _run = tracing::info_span!("run", run_id = %run_id).entered();

    let op = cli.command.op_name();
    let start = Instant::now();
    log_op_start!(op);

    let result = match cli.command {
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Snapshot(args) => commands::snapshot::execute(args),
        Commands::Compare(args) => commands::compare::execute(args),
    };
    let duration_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(code) => {
            log_op_end!(op, duration_ms = duration_ms, exit_code = code);
            std::process::exit(code)
        }
        Err(e) => {
            log_op_error!(op, classify(e.as_ref()), duration_ms = duration_ms);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layercheck_core::ExErrorKind;

    #[test]
    fn test_classify_keeps_known_error_kinds() {
        let missing: Box<dyn Error> = Box::new(LayerCheckError::Io {
            action: "read",
            path: "doc.json".to_string(),
            message: "not found".to_string(),
        });
        assert_eq!(classify(missing.as_ref()).kind(), ExErrorKind::Io);

        let drift: Box<dyn Error> = Box::new(ExError::new(ExErrorKind::DeterminismViolation));
        assert_eq!(classify(drift.as_ref()).kind(), ExErrorKind::DeterminismViolation);

        let bad_json: Box<dyn Error> = Box::new(serde_json::from_str::<u32>("x").unwrap_err());
        assert_eq!(classify(bad_json.as_ref()).kind(), ExErrorKind::Serialization);
    }

    #[test]
    fn test_classify_falls_back_to_internal() {
        let other: Box<dyn Error> = "unexpected".into();
        let ex = classify(other.as_ref());
        assert_eq!(ex.code(), "ERR_INTERNAL");
        assert_eq!(ex.message(), "unexpected");
    }
}
