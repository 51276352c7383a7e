use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use mechlab_cli::commands::{
    chassis::handle_list_chassis,
    coder_stats::{handle_coder_stats, CoderStatsArgs},
    decode::{handle_decode, DecodeArgs},
    encode::{handle_encode, EncodeArgs},
};
use mechlab_cli::config::DataPaths;

#[derive(Parser, Debug)]
#[command(author, version, about = "Mech loadout link utilities")]
struct Cli {
    /// Catalog JSON file. Falls back to MECHLAB_CATALOG, the user data
    /// directory, then the repository fixture in debug builds.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Coder frequency table CSV. Falls back to MECHLAB_FREQUENCIES, the user
    /// data directory, then the table built into the library.
    #[arg(long, global = true)]
    frequencies: Option<PathBuf>,

    /// Emit JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every chassis in the catalog.
    Chassis,
    /// Encode a stock or empty loadout as a link.
    Encode(EncodeArgs),
    /// Decode a link and print the loadout it describes.
    Decode(DecodeArgs),
    /// Regenerate the coder frequency table from the catalog.
    CoderStats(CoderStatsArgs),
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let paths = DataPaths::new(cli.catalog, cli.frequencies);

    match cli.command {
        Command::Chassis => handle_list_chassis(&paths, cli.json),
        Command::Encode(args) => handle_encode(&paths, &args, cli.json),
        Command::Decode(args) => handle_decode(&paths, &args, cli.json),
        Command::CoderStats(args) => handle_coder_stats(&paths, &args),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
