//! Decode command handler.

use std::io;

use anyhow::{Context, Result};
use clap::Args;

use mechlab_lib::{decode_link, Error, ErrorReporter, LoadoutCoderV3, TracingReporter};

use crate::config::DataPaths;
use crate::output::{render_loadout, LoadoutView};

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// An `lsml://` link or an http link carrying an `lsml` query parameter.
    pub link: String,
}

/// Logs through [`TracingReporter`] and keeps each message for the output.
#[derive(Debug, Default)]
struct DecodeWarnings {
    log: TracingReporter,
    messages: Vec<String>,
}

impl ErrorReporter for DecodeWarnings {
    fn report(&mut self, error: Error) {
        self.messages.push(error.to_string());
        self.log.report(error);
    }
}

/// Handle the decode subcommand.
///
/// Prints the reconstructed loadout followed by every recoverable problem
/// met while decoding. Content that could not be applied is skipped, not
/// fatal.
pub fn handle_decode(paths: &DataPaths, args: &DecodeArgs, json: bool) -> Result<()> {
    let database = paths.load_database()?;
    let frequencies = paths.load_frequencies()?;
    let coder = LoadoutCoderV3::new(&database, &frequencies)
        .context("failed to build the loadout coder")?;

    let bytes = decode_link(&args.link).context("failed to read loadout link")?;
    if let Some(&header) = bytes.first() {
        if !LoadoutCoderV3::can_decode(&bytes) {
            return Err(Error::UnsupportedFormat { header }).context("failed to decode loadout");
        }
    }

    let mut warnings = DecodeWarnings::default();
    let loadout = coder
        .decode_with(&bytes, &mut warnings)
        .context("failed to decode loadout")?;

    let view = LoadoutView::new(&loadout, warnings.messages);
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        render_loadout(&mut handle, &view)?;
    }
    Ok(())
}
