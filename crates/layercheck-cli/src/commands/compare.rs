//! Compare command

use std::path::{Path, PathBuf};

use clap::Args;
use layercheck_core::diff::{check_round_trip, render_human_summary};
use layercheck_core::{compare_with_config, LayerCheckError, LayerSnapshot};

use super::{load_config, read_file, OutputFormat};

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Snapshot file of the earlier version
    #[arg(long)]
    pub base: PathBuf,

    /// Snapshot file of the later version
    #[arg(long)]
    pub new: PathBuf,

    /// Engine configuration (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

fn load_snapshots(path: &Path) -> Result<Vec<LayerSnapshot>, LayerCheckError> {
    serde_json::from_str(&read_file(path)?).map_err(|e| LayerCheckError::InvalidDocument {
        reason: format!("{} is not a snapshot file: {}", path.display(), e),
    })
}

pub fn execute(args: CompareArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_config(args.config.as_deref())?;
    let base = load_snapshots(&args.base)?;
    let new = load_snapshots(&args.new)?;

    let result = compare_with_config(&base, &new, &config.comparison);
    check_round_trip(&result)?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => print!("{}", render_human_summary(&result)),
    }
    Ok(0)
}
