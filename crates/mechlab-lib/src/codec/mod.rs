//! Loadout wire format.
//!
//! - [`bits`] - MSB-first bit writer and reader
//! - [`huffman`] - Static Huffman code with a stop symbol
//! - [`frequency`] - Frequency table resource the code is built from
//! - [`v3`] - The version 3 loadout format
//! - [`report`] - Sinks for recoverable decode failures

pub mod bits;
pub mod frequency;
pub mod huffman;
pub mod report;
pub mod v3;

pub use bits::{BitReader, BitWriter};
pub use frequency::FrequencyTable;
pub use huffman::HuffmanCode;
pub use report::{ErrorReporter, TracingReporter};
pub use v3::{symbol_sequence, LoadoutCoderV3, HEADER_MAGIC, SENTINEL, STOP_SYMBOL};
