//! MSB-first bit packing.

/// Accumulates bits most significant first into a byte buffer.
#[derive(Debug, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    cur: u8,
    bits: u8, // bits currently in cur (0..8)
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_bit(&mut self, bit: bool) {
        self.cur = (self.cur << 1) | u8::from(bit);
        self.bits += 1;
        if self.bits == 8 {
            self.bytes.push(self.cur);
            self.cur = 0;
            self.bits = 0;
        }
    }

    /// Write the low `bit_count` bits of `value`, most significant first.
    pub fn write_bits(&mut self, value: u64, bit_count: u8) {
        for i in (0..bit_count).rev() {
            self.write_bit((value >> i) & 1 == 1);
        }
    }

    /// Flush, zero-padding the final partial byte.
    pub fn finish(mut self) -> Vec<u8> {
        if self.bits > 0 {
            self.cur <<= 8 - self.bits;
            self.bytes.push(self.cur);
        }
        self.bytes
    }
}

/// Reads bits most significant first from a byte slice.
#[derive(Debug)]
pub struct BitReader<'a> {
    buf: &'a [u8],
    idx: usize,     // byte index
    bits_left: u8,  // bits remaining in buf[idx]
}

impl<'a> BitReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            idx: 0,
            bits_left: if buf.is_empty() { 0 } else { 8 },
        }
    }

    /// The next bit, or `None` once the buffer is exhausted.
    pub fn read_bit(&mut self) -> Option<bool> {
        if self.bits_left == 0 {
            if self.idx + 1 >= self.buf.len() {
                return None;
            }
            self.idx += 1;
            self.bits_left = 8;
        }
        self.bits_left -= 1;
        Some((self.buf[self.idx] >> self.bits_left) & 1 == 1)
    }
}
