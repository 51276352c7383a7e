//! Coder-stats command handler.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use mechlab_lib::FrequencyTable;

use crate::config::DataPaths;

#[derive(Args, Debug)]
pub struct CoderStatsArgs {
    /// Where to write the CSV table. Prints to stdout when omitted.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Handle the coder-stats subcommand.
///
/// Counts wire symbols over every stock and empty loadout of the catalog
/// and writes the resulting frequency table.
pub fn handle_coder_stats(paths: &DataPaths, args: &CoderStatsArgs) -> Result<()> {
    let database = paths.load_database()?;
    let table = FrequencyTable::from_corpus(&database)
        .context("failed to count symbols over the catalog")?;
    // The regenerated table must itself build a usable code.
    table
        .build_code()
        .context("regenerated frequency table does not build a code")?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            table
                .write_csv(BufWriter::new(file))
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(symbols = table.len(), path = %path.display(), "wrote frequency table");
            println!("Wrote {} symbols to {}", table.len(), path.display());
        }
        None => {
            table
                .write_csv(io::stdout().lock())
                .context("failed to write frequency table")?;
        }
    }
    Ok(())
}
