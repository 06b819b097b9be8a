//! Snapshot command

use std::path::PathBuf;

use clap::Args;
use layercheck_core::snapshot::compute_snapshot_digest;
use layercheck_core::{extract, Document};

use super::{read_file, write_file};

#[derive(Debug, Args)]
pub struct SnapshotArgs {
    /// Parsed drawing (JSON)
    #[arg(long)]
    pub document: PathBuf,

    /// Write snapshots here instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub fn execute(args: SnapshotArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let document = Document::from_json(&read_file(&args.document)?)?;
    let snapshots = extract(&document);
    let json = serde_json::to_string_pretty(&snapshots)?;

    match args.output {
        Some(path) => {
            write_file(&path, &json)?;
            eprintln!(
                "{} layer snapshots written to {} (digest {})",
                snapshots.len(),
                path.display(),
                compute_snapshot_digest(&snapshots)?
            );
        }
        None => println!("{}", json),
    }
    Ok(0)
}
