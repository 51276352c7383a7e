//! Encode command handler.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;

use mechlab_lib::{encode_link, Chassis, Database, LinkStyle, LoadoutCoderV3};

use crate::config::DataPaths;

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Chassis name (case-insensitive) or numeric id.
    #[arg(long)]
    pub chassis: String,

    /// Encode the empty loadout instead of the stock one.
    #[arg(long)]
    pub empty: bool,

    /// Link format to print.
    #[arg(long, value_enum, default_value_t = StyleArg::Lsml)]
    pub style: StyleArg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StyleArg {
    Lsml,
    Http,
}

impl From<StyleArg> for LinkStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Lsml => LinkStyle::Lsml,
            StyleArg::Http => LinkStyle::Http,
        }
    }
}

#[derive(Debug, Serialize)]
struct EncodeOutput<'a> {
    chassis: &'a str,
    chassis_id: u32,
    loadout: &'static str,
    style: LinkStyle,
    bytes: usize,
    link: String,
}

/// Handle the encode subcommand.
///
/// Builds the stock (or empty) loadout of a chassis and prints it as a link.
pub fn handle_encode(paths: &DataPaths, args: &EncodeArgs, json: bool) -> Result<()> {
    let database = paths.load_database()?;
    let frequencies = paths.load_frequencies()?;
    let coder = LoadoutCoderV3::new(&database, &frequencies)
        .context("failed to build the loadout coder")?;

    let chassis = resolve_chassis(&database, &args.chassis)?;
    let (kind, loadout) = if args.empty {
        ("empty", database.empty_loadout(chassis.id)?)
    } else {
        ("stock", database.stock_loadout(chassis.id)?)
    };

    let bytes = coder
        .encode(&loadout)
        .with_context(|| format!("failed to encode {} loadout of {}", kind, chassis.name))?;
    let style = LinkStyle::from(args.style);
    let link = encode_link(&bytes, style);

    if json {
        let output = EncodeOutput {
            chassis: &chassis.name,
            chassis_id: chassis.id,
            loadout: kind,
            style,
            bytes: bytes.len(),
            link,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", link);
    }
    Ok(())
}

/// Look a chassis up by numeric id, then by name.
pub fn resolve_chassis(database: &Database, query: &str) -> Result<Arc<Chassis>> {
    if let Ok(id) = query.trim().parse::<u32>() {
        return Ok(Arc::clone(database.chassis(id)?));
    }
    Ok(Arc::clone(database.chassis_by_name(query)?))
}
