//! Static Huffman code with an explicit stop symbol.
//!
//! The code is built once from a frequency table. Construction is
//! deterministic: ties between equal weights are broken by creation order,
//! and leaves are created in ascending symbol order, so the same table
//! always yields the same bit patterns.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};
use std::fmt::Debug;

use super::bits::{BitReader, BitWriter};
use crate::error::{Error, Result};

/// Longest code the encoder can emit.
const MAX_CODE_LEN: u8 = 64;

#[derive(Debug, Clone)]
enum Node<T> {
    Leaf(T),
    Internal { zero: usize, one: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Code {
    bits: u64,
    len: u8,
}

/// A prefix code over symbols of type `T`.
#[derive(Debug, Clone)]
pub struct HuffmanCode<T> {
    nodes: Vec<Node<T>>,
    root: usize,
    codes: BTreeMap<T, Code>,
    stop: T,
}

impl<T: Ord + Copy + Debug> HuffmanCode<T> {
    /// Build a code from `(symbol, frequency)` pairs. `stop` terminates every
    /// encoded stream and must not appear among `frequencies`.
    pub fn new(
        frequencies: impl IntoIterator<Item = (T, u64)>,
        stop: T,
        stop_frequency: u64,
    ) -> Result<Self> {
        let mut weights: BTreeMap<T, u64> = BTreeMap::new();
        for (symbol, frequency) in frequencies {
            if symbol == stop {
                return Err(Error::HuffmanTable {
                    message: format!("symbol {symbol:?} is reserved as the stop symbol"),
                });
            }
            if weights.insert(symbol, frequency).is_some() {
                return Err(Error::HuffmanTable {
                    message: format!("symbol {symbol:?} appears more than once"),
                });
            }
        }
        weights.insert(stop, stop_frequency);

        let mut nodes: Vec<Node<T>> = Vec::with_capacity(weights.len() * 2);
        let mut heap = BinaryHeap::new();
        for (&symbol, &weight) in &weights {
            heap.push(Reverse((weight, nodes.len())));
            nodes.push(Node::Leaf(symbol));
        }

        while heap.len() > 1 {
            let (Some(Reverse((w0, zero))), Some(Reverse((w1, one)))) = (heap.pop(), heap.pop())
            else {
                break;
            };
            heap.push(Reverse((w0.saturating_add(w1), nodes.len())));
            nodes.push(Node::Internal { zero, one });
        }
        let root = nodes.len() - 1;

        let mut code = Self {
            nodes,
            root,
            codes: BTreeMap::new(),
            stop,
        };
        code.assign_codes()?;
        Ok(code)
    }

    fn assign_codes(&mut self) -> Result<()> {
        // A lone symbol still needs one bit so the stream is non-empty.
        if let Node::Leaf(symbol) = self.nodes[self.root] {
            self.codes.insert(symbol, Code { bits: 0, len: 1 });
            return Ok(());
        }

        let mut stack = vec![(self.root, Code { bits: 0, len: 0 })];
        while let Some((index, code)) = stack.pop() {
            match self.nodes[index] {
                Node::Leaf(symbol) => {
                    self.codes.insert(symbol, code);
                }
                Node::Internal { zero, one } => {
                    if code.len >= MAX_CODE_LEN {
                        return Err(Error::HuffmanTable {
                            message: format!("code length exceeds {MAX_CODE_LEN} bits"),
                        });
                    }
                    let len = code.len + 1;
                    stack.push((one, Code { bits: (code.bits << 1) | 1, len }));
                    stack.push((zero, Code { bits: code.bits << 1, len }));
                }
            }
        }
        Ok(())
    }

    /// Number of symbols including the stop symbol.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Length in bits of a symbol's code.
    pub fn code_len(&self, symbol: &T) -> Option<u8> {
        self.codes.get(symbol).map(|code| code.len)
    }

    /// Encode `symbols` followed by the stop symbol.
    pub fn encode(&self, symbols: &[T]) -> Result<Vec<u8>> {
        let mut writer = BitWriter::new();
        for symbol in symbols {
            if *symbol == self.stop {
                return Err(Error::Encoding {
                    message: format!("symbol {symbol:?} is reserved as the stop symbol"),
                });
            }
            self.write(&mut writer, symbol)?;
        }
        self.write(&mut writer, &self.stop)?;
        Ok(writer.finish())
    }

    fn write(&self, writer: &mut BitWriter, symbol: &T) -> Result<()> {
        let code = self.codes.get(symbol).ok_or_else(|| Error::Encoding {
            message: format!("symbol {symbol:?} has no code in the frequency table"),
        })?;
        writer.write_bits(code.bits, code.len);
        Ok(())
    }

    /// Decode symbols up to the stop symbol. Bits after the stop symbol are
    /// padding and ignored.
    pub fn decode(&self, bytes: &[u8]) -> Result<Vec<T>> {
        let mut reader = BitReader::new(bytes);
        let mut symbols = Vec::new();
        loop {
            let symbol = self.read(&mut reader)?;
            if symbol == self.stop {
                return Ok(symbols);
            }
            symbols.push(symbol);
        }
    }

    fn read(&self, reader: &mut BitReader<'_>) -> Result<T> {
        let mut index = self.root;
        if let Node::Leaf(symbol) = self.nodes[index] {
            next_bit(reader)?;
            return Ok(symbol);
        }
        loop {
            match self.nodes[index] {
                Node::Leaf(symbol) => return Ok(symbol),
                Node::Internal { zero, one } => {
                    index = if next_bit(reader)? { one } else { zero };
                }
            }
        }
    }
}

fn next_bit(reader: &mut BitReader<'_>) -> Result<bool> {
    reader.read_bit().ok_or_else(|| Error::MalformedStream {
        message: "compressed data ended before the stop symbol".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const STOP: i32 = i32::MIN;

    fn code() -> HuffmanCode<i32> {
        HuffmanCode::new([(-1, 50), (1000, 20), (1500, 10), (2810, 5)], STOP, 5)
            .expect("valid table")
    }

    #[test]
    fn frequent_symbols_get_shorter_codes() {
        let code = code();
        let sentinel = code.code_len(&-1).expect("sentinel coded");
        let rare = code.code_len(&2810).expect("rare coded");
        assert!(sentinel < rare);
        assert_eq!(code.len(), 5);
    }

    #[test]
    fn decodes_what_it_encodes_and_ignores_padding() {
        let code = code();
        let symbols = vec![2810, -1, 1000, 1000, -1, 1500];
        let bytes = code.encode(&symbols).expect("all symbols coded");
        assert_eq!(code.decode(&bytes).expect("well formed"), symbols);
    }

    #[test]
    fn construction_is_deterministic() {
        let a = code().encode(&[1000, 1500, -1]).expect("coded");
        let b = code().encode(&[1000, 1500, -1]).expect("coded");
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_symbol_is_an_encoding_error() {
        let err = code().encode(&[42]).expect_err("not in table");
        assert!(matches!(err, Error::Encoding { .. }));
    }

    #[test]
    fn truncated_stream_is_malformed() {
        let code = code();
        let bytes = code.encode(&[2810, 2810, 2810, 2810]).expect("coded");
        let err = code.decode(&bytes[..1]).expect_err("cut short");
        assert!(matches!(err, Error::MalformedStream { .. }));
    }

    #[test]
    fn duplicate_and_reserved_symbols_are_rejected() {
        let err = HuffmanCode::new([(1, 1), (1, 2)], STOP, 1).expect_err("duplicate");
        assert!(matches!(err, Error::HuffmanTable { .. }));
        let err = HuffmanCode::new([(STOP, 1)], STOP, 1).expect_err("reserved");
        assert!(matches!(err, Error::HuffmanTable { .. }));
    }

    #[test]
    fn stop_only_code_round_trips_an_empty_stream() {
        let code = HuffmanCode::<i32>::new([], STOP, 1).expect("valid");
        let bytes = code.encode(&[]).expect("coded");
        assert_eq!(bytes, vec![0]);
        assert!(code.decode(&bytes).expect("well formed").is_empty());
    }
}
