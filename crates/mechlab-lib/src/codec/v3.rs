//! Version 3 loadout wire format.
//!
//! ```text
//! byte 0        HEADER_MAGIC
//! bytes 1..3    chassis id, big-endian u16
//! 11 bytes      armor per side in right-to-left location order
//!               (torsos: front, back)
//! omni only     actuator bitmap: bit 3 RA lower arm, bit 2 RA hand,
//!               bit 1 LA lower arm, bit 0 LA hand
//! rest          Huffman-coded symbol sequence, terminated by the stop
//!               symbol and zero-padded to a byte
//! ```
//!
//! Symbol sequence, standard chassis: the four upgrade ids in armor,
//! structure, heat sink, guidance order; for each location right to left,
//! its item ids followed by [`SENTINEL`]; then module ids.
//!
//! Omni chassis: the guidance upgrade id; for each location right to left,
//! the pod id (not for the center torso), item ids and [`SENTINEL`]; then
//! module ids.

use crate::catalog::Database;
use crate::command::{Command, CommandBatch};
use crate::error::{Error, Result};
use crate::model::{Actuator, Loadout, Location};

use super::frequency::FrequencyTable;
use super::huffman::HuffmanCode;
use super::report::ErrorReporter;

/// First byte of every version 3 stream.
pub const HEADER_MAGIC: u8 = 0xAE;

/// Terminates each location's item list in the symbol sequence.
pub const SENTINEL: i32 = -1;

/// Ends the Huffman stream. Never a wire id.
pub const STOP_SYMBOL: i32 = i32::MIN;

/// Number of armor bytes: one per side of every location.
const ARMOR_BYTES: usize = 11;

const HEADER_BYTES: usize = 3;

/// Actuator bitmap layout: location, actuator and bit position.
const ACTUATOR_BITS: [(Location, Actuator, u8); 4] = [
    (Location::RightArm, Actuator::LowerArm, 3),
    (Location::RightArm, Actuator::Hand, 2),
    (Location::LeftArm, Actuator::LowerArm, 1),
    (Location::LeftArm, Actuator::Hand, 0),
];

fn wire_id(id: u32) -> Result<i32> {
    i32::try_from(id).map_err(|_| Error::Encoding {
        message: format!("id {id} does not fit the wire format"),
    })
}

fn catalog_id(symbol: i32) -> Result<u32> {
    u32::try_from(symbol).map_err(|_| Error::MalformedStream {
        message: format!("unexpected symbol {symbol} where an id was expected"),
    })
}

/// The pre-compression symbol sequence of a loadout.
pub fn symbol_sequence(loadout: &Loadout) -> Result<Vec<i32>> {
    let omni = loadout.chassis().is_omni();
    let mut symbols = Vec::new();

    if omni {
        symbols.push(wire_id(loadout.upgrades().guidance().id)?);
    } else {
        for upgrade in loadout.upgrades().in_wire_order() {
            symbols.push(wire_id(upgrade.id)?);
        }
    }

    for location in Location::RIGHT_TO_LEFT {
        let component = loadout.component(location);
        if omni && location != Location::CenterTorso {
            let pod = component.pod().ok_or_else(|| Error::Encoding {
                message: format!("omni loadout has no pod in the {location}"),
            })?;
            symbols.push(wire_id(pod.id)?);
        }
        for item in component.items() {
            symbols.push(wire_id(item.id)?);
        }
        symbols.push(SENTINEL);
    }

    for module in loadout.modules() {
        symbols.push(wire_id(module.id)?);
    }
    Ok(symbols)
}

/// Symbol sequence split back into its sections.
#[derive(Debug, Default)]
struct ParsedSymbols {
    upgrades: Vec<u32>,
    /// Per location, right to left: pod id and item ids.
    locations: Vec<(Location, Option<u32>, Vec<u32>)>,
    modules: Vec<u32>,
}

fn parse_symbols(symbols: &[i32], omni: bool) -> Result<ParsedSymbols> {
    let mut iter = symbols.iter().copied();
    let mut parsed = ParsedSymbols::default();
    let ended = |what: &str| Error::MalformedStream {
        message: format!("symbol stream ended before {what}"),
    };

    let upgrade_count = if omni { 1 } else { 4 };
    for _ in 0..upgrade_count {
        let symbol = iter.next().ok_or_else(|| ended("the upgrades"))?;
        parsed.upgrades.push(catalog_id(symbol)?);
    }

    for location in Location::RIGHT_TO_LEFT {
        let pod = if omni && location != Location::CenterTorso {
            let symbol = iter
                .next()
                .ok_or_else(|| ended(&format!("the {location} pod")))?;
            Some(catalog_id(symbol)?)
        } else {
            None
        };
        let mut items = Vec::new();
        loop {
            match iter.next() {
                Some(SENTINEL) => break,
                Some(symbol) => items.push(catalog_id(symbol)?),
                None => return Err(ended(&format!("the end of the {location}"))),
            }
        }
        parsed.locations.push((location, pod, items));
    }

    for symbol in iter {
        parsed.modules.push(catalog_id(symbol)?);
    }
    Ok(parsed)
}

/// Encoder/decoder for the version 3 format over one catalog.
#[derive(Debug, Clone)]
pub struct LoadoutCoderV3<'a> {
    database: &'a Database,
    code: HuffmanCode<i32>,
}

impl<'a> LoadoutCoderV3<'a> {
    pub fn new(database: &'a Database, frequencies: &FrequencyTable) -> Result<Self> {
        Ok(Self {
            database,
            code: frequencies.build_code()?,
        })
    }

    /// Coder using the frequency table embedded in the library.
    pub fn with_embedded_table(database: &'a Database) -> Result<Self> {
        Self::new(database, &FrequencyTable::embedded()?)
    }

    /// Whether `bytes` start with this format's header.
    pub fn can_decode(bytes: &[u8]) -> bool {
        bytes.first() == Some(&HEADER_MAGIC)
    }

    pub fn encode(&self, loadout: &Loadout) -> Result<Vec<u8>> {
        let chassis = loadout.chassis();
        let chassis_id = u16::try_from(chassis.id).map_err(|_| Error::Encoding {
            message: format!("chassis id {} does not fit in 16 bits", chassis.id),
        })?;

        let mut bytes = Vec::with_capacity(32);
        bytes.push(HEADER_MAGIC);
        bytes.extend_from_slice(&chassis_id.to_be_bytes());

        for location in Location::RIGHT_TO_LEFT {
            for &side in location.armor_sides() {
                let armor = loadout.armor(location, side);
                let byte = u8::try_from(armor).map_err(|_| Error::Encoding {
                    message: format!("{armor} armor in the {location} does not fit in a byte"),
                })?;
                bytes.push(byte);
            }
        }

        if chassis.is_omni() {
            let mut bitmap = 0u8;
            for (location, actuator, bit) in ACTUATOR_BITS {
                if loadout.component(location).toggles().get(actuator) {
                    bitmap |= 1 << bit;
                }
            }
            bytes.push(bitmap);
        }

        let symbols = symbol_sequence(loadout)?;
        bytes.extend(self.code.encode(&symbols)?);
        Ok(bytes)
    }

    /// Decode a stream, returning the loadout and every recoverable failure.
    pub fn decode(&self, bytes: &[u8]) -> Result<(Loadout, Vec<Error>)> {
        let mut errors = Vec::new();
        let loadout = self.decode_with(bytes, &mut errors)?;
        Ok((loadout, errors))
    }

    /// Decode a stream, forwarding recoverable failures to `reporter`.
    ///
    /// Structural problems (header, truncation, malformed compressed data,
    /// unknown chassis) fail the whole decode. Stale references and commands
    /// the loadout rejects are skipped and reported.
    pub fn decode_with(&self, bytes: &[u8], reporter: &mut dyn ErrorReporter) -> Result<Loadout> {
        match bytes.first() {
            Some(&HEADER_MAGIC) => {}
            Some(&header) => return Err(Error::UnsupportedFormat { header }),
            None => {
                return Err(Error::TruncatedData {
                    expected: HEADER_BYTES,
                    actual: 0,
                })
            }
        }
        if bytes.len() < HEADER_BYTES {
            return Err(Error::TruncatedData {
                expected: HEADER_BYTES,
                actual: bytes.len(),
            });
        }

        let chassis_id = u32::from(u16::from_be_bytes([bytes[1], bytes[2]]));
        let mut loadout = self.database.empty_loadout(chassis_id)?;
        let omni = loadout.chassis().is_omni();

        let fixed = HEADER_BYTES + ARMOR_BYTES + usize::from(omni);
        if bytes.len() < fixed {
            return Err(Error::TruncatedData {
                expected: fixed,
                actual: bytes.len(),
            });
        }
        let armor = &bytes[HEADER_BYTES..HEADER_BYTES + ARMOR_BYTES];
        let bitmap = if omni { bytes[fixed - 1] } else { 0 };
        let symbols = self.code.decode(&bytes[fixed..])?;
        let parsed = parse_symbols(&symbols, omni)?;

        let batch = self.build_batch(armor, bitmap, omni, parsed);
        let report = batch.apply(&mut loadout);
        for error in report.errors {
            reporter.report(error);
        }
        Ok(loadout)
    }

    /// Commands in an order where every intermediate loadout is a subset of
    /// the final one: upgrades, armor, then per location pod, actuators and
    /// items, then modules.
    fn build_batch(
        &self,
        armor: &[u8],
        bitmap: u8,
        omni: bool,
        parsed: ParsedSymbols,
    ) -> CommandBatch {
        let db = self.database;
        let mut batch = CommandBatch::new();

        for id in parsed.upgrades {
            batch.push_result(db.set_upgrade_command(id));
        }

        let sides = Location::RIGHT_TO_LEFT.iter().flat_map(|&location| {
            location
                .armor_sides()
                .iter()
                .map(move |&side| (location, side))
        });
        for ((location, side), &amount) in sides.zip(armor) {
            batch.push(Command::set_armor(location, side, u32::from(amount)));
        }

        for (location, pod, items) in parsed.locations {
            if let Some(pod) = pod {
                batch.push_result(db.set_pod_command(pod, location));
            }
            if omni {
                for (arm, actuator, bit) in ACTUATOR_BITS {
                    if arm == location {
                        let state = bitmap & (1 << bit) != 0;
                        batch.push(Command::toggle_actuator(location, actuator, state));
                    }
                }
            }
            for item in items {
                batch.push_result(db.add_item_command(location, item));
            }
        }

        for module in parsed.modules {
            batch.push_result(db.add_module_command(module));
        }
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_decode_checks_only_the_header_byte() {
        assert!(LoadoutCoderV3::can_decode(&[0xAE, 0x07, 0xD0]));
        assert!(!LoadoutCoderV3::can_decode(&[0xAF, 0x07, 0xD0]));
        assert!(!LoadoutCoderV3::can_decode(&[]));
    }

    #[test]
    fn parses_standard_symbol_sections() {
        let symbols = [
            2810, 3100, 3000, 3050, // upgrades
            1500, -1, -1, -1, -1, 3200, -1, -1, -1, -1, // locations
            4001, // modules
        ];
        let parsed = parse_symbols(&symbols, false).expect("well formed");
        assert_eq!(parsed.upgrades, vec![2810, 3100, 3000, 3050]);
        assert_eq!(parsed.locations[0], (Location::RightArm, None, vec![1500]));
        assert_eq!(parsed.locations[4], (Location::CenterTorso, None, vec![3200]));
        assert_eq!(parsed.modules, vec![4001]);
    }

    #[test]
    fn parses_omni_pods_except_center_torso() {
        let mut symbols = vec![3050];
        for location in Location::RIGHT_TO_LEFT {
            if location != Location::CenterTorso {
                symbols.push(5000 + location.index() as i32);
            }
            symbols.push(SENTINEL);
        }
        let parsed = parse_symbols(&symbols, true).expect("well formed");
        assert_eq!(parsed.upgrades, vec![3050]);
        assert_eq!(parsed.locations[0].1, Some(5001));
        assert_eq!(parsed.locations[4].1, None);
        assert!(parsed.modules.is_empty());
    }

    #[test]
    fn missing_sentinel_is_malformed() {
        let symbols = [2810, 3100, 3000, 3050, 1500, -1];
        let err = parse_symbols(&symbols, false).expect_err("seven locations missing");
        assert!(matches!(err, Error::MalformedStream { .. }));
    }

    #[test]
    fn negative_ids_are_malformed() {
        let symbols = [2810, 3100, 3000, -7];
        let err = parse_symbols(&symbols, false).expect_err("negative upgrade");
        assert!(matches!(err, Error::MalformedStream { .. }));
    }
}
