//! Validate command

use std::path::PathBuf;

use clap::Args;
use layercheck_core::rules::{render_lisp, Severity, ValidationReport, VerdictStatus};
use layercheck_core::{validate_with_config, Document, RuleSet};

use super::{load_config, read_file, write_file, OutputFormat};

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Parsed drawing (JSON)
    #[arg(long)]
    pub document: PathBuf,

    /// Rule file (JSON array of layer rules)
    #[arg(long)]
    pub rules: PathBuf,

    /// Engine configuration (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write the repair actions as JSON to this file
    #[arg(long)]
    pub fix_output: Option<PathBuf>,

    /// Write the repair actions as an AutoLISP script (`FixLayers`)
    #[arg(long)]
    pub fix_script: Option<PathBuf>,
}

/// Exit code 1 when the report has errors
pub fn execute(args: ValidateArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_config(args.config.as_deref())?;
    let document = Document::from_json(&read_file(&args.document)?)?;
    let rules = RuleSet::from_json(&read_file(&args.rules)?)?;

    let report = validate_with_config(&document, &rules, &config.validation);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print!("{}", render_text(&report)),
    }

    if let Some(path) = args.fix_output {
        write_file(&path, &serde_json::to_string_pretty(&report.fix_actions)?)?;
        tracing::info!(path = %path.display(), count = report.fix_actions.len(), "fix actions written");
    }

    if let Some(path) = args.fix_script {
        write_file(&path, &render_lisp(&report.fix_actions))?;
        tracing::info!(path = %path.display(), count = report.fix_actions.len(), "fix script written");
    }

    Ok(if report.has_errors() { 1 } else { 0 })
}

fn render_text(report: &ValidationReport) -> String {
    let mut out = String::new();

    for check in report.unit_checks.iter().filter(|c| !c.passed) {
        let tag = match check.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN",
        };
        out.push_str(&format!("{:<5} {}\n", tag, check.detail.as_deref().unwrap_or(&check.variable)));
    }

    for finding in &report.findings {
        let tag = match finding.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN",
        };
        out.push_str(&format!("{:<5} {}\n", tag, finding.message));
    }

    for verdict in report.layer_verdicts.iter().filter(|v| v.status != VerdictStatus::Valid) {
        out.push_str(&format!("{:<7} {}\n", verdict.status, verdict.layer_name));
        for reason in &verdict.reasons {
            out.push_str(&format!("        - {}\n", reason));
        }
    }

    let valid = report
        .layer_verdicts
        .iter()
        .filter(|v| v.status == VerdictStatus::Valid)
        .count();
    out.push_str(&format!(
        "\n{} layers checked: {} valid, {} errors, {} warnings\n",
        report.layer_verdicts.len(),
        valid,
        report.error_count(),
        report.warning_count()
    ));
    out
}
