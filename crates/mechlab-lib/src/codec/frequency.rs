//! Symbol frequency table backing the static Huffman code.
//!
//! The table is a two-column CSV (`symbol,frequency`). A default table is
//! embedded in the library; [`FrequencyTable::from_corpus`] regenerates one
//! from a catalog.

use std::collections::BTreeMap;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::huffman::HuffmanCode;
use super::v3::{symbol_sequence, SENTINEL, STOP_SYMBOL};
use crate::catalog::Database;
use crate::error::{Error, Result};
use crate::model::LOCATION_COUNT;

/// Default table shipped with the library.
const EMBEDDED_TABLE: &str = include_str!("../../data/coder_frequencies_v3.csv");

#[derive(Debug, Serialize, Deserialize)]
struct FrequencyRecord {
    symbol: i32,
    frequency: u64,
}

/// Observed frequency of each wire symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: BTreeMap<i32, u64>,
}

impl FrequencyTable {
    /// The table embedded in the library.
    pub fn embedded() -> Result<Self> {
        Self::from_reader(EMBEDDED_TABLE.as_bytes())
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let mut table = Self::default();
        for record in csv_reader.deserialize() {
            let FrequencyRecord { symbol, frequency } = record?;
            if symbol == STOP_SYMBOL {
                return Err(Error::HuffmanTable {
                    message: format!("symbol {symbol} is reserved"),
                });
            }
            if table.entries.insert(symbol, frequency).is_some() {
                return Err(Error::HuffmanTable {
                    message: format!("symbol {symbol} appears more than once"),
                });
            }
        }
        if table.entries.is_empty() {
            return Err(Error::HuffmanTable {
                message: "frequency table is empty".to_string(),
            });
        }
        debug!(symbols = table.entries.len(), "loaded coder frequency table");
        Ok(table)
    }

    /// Count symbols over every stock and empty loadout of a catalog. Every
    /// catalog id gets a base count of one so it stays encodable.
    pub fn from_corpus(database: &Database) -> Result<Self> {
        let mut table = Self::default();
        let ids = database
            .items()
            .map(|i| i.id)
            .chain(database.upgrades().map(|u| u.id))
            .chain(database.pods().map(|p| p.id));
        for id in ids {
            let symbol = i32::try_from(id).map_err(|_| Error::Encoding {
                message: format!("catalog id {id} does not fit the wire format"),
            })?;
            table.entries.insert(symbol, 1);
        }
        table.entries.insert(SENTINEL, 1);

        for chassis in database.chassis_sorted() {
            let empty = database.empty_loadout(chassis.id)?;
            let stock = database.stock_loadout(chassis.id)?;
            for loadout in [empty, stock] {
                for symbol in symbol_sequence(&loadout)? {
                    *table.entries.entry(symbol).or_insert(0) += 1;
                }
            }
        }
        Ok(table)
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = WriterBuilder::new().from_writer(writer);
        for (&symbol, &frequency) in &self.entries {
            csv_writer.serialize(FrequencyRecord { symbol, frequency })?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn get(&self, symbol: i32) -> Option<u64> {
        self.entries.get(&symbol).copied()
    }

    pub fn insert(&mut self, symbol: i32, frequency: u64) -> Option<u64> {
        self.entries.insert(symbol, frequency)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, u64)> + '_ {
        self.entries.iter().map(|(&s, &f)| (s, f))
    }

    /// Build the Huffman code. The stop symbol ends each loadout once, so it
    /// is weighted as one loadout's worth of sentinels.
    pub fn build_code(&self) -> Result<HuffmanCode<i32>> {
        let loadouts = self.get(SENTINEL).unwrap_or(0) / LOCATION_COUNT as u64;
        HuffmanCode::new(self.iter(), STOP_SYMBOL, loadouts.max(1))
    }
}
