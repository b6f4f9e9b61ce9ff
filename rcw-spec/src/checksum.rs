//! # PBL checksum
//!
//! MSB-first CRC-32 with polynomial `0x04C11DB7`, initial value
//! `0xFFFFFFFF`, no input/output reflection and no final XOR. This is not
//! the zlib/PNG CRC-32; images are only accepted by the boot ROM when the
//! trailer is computed this way.

/// Generator polynomial
pub const POLYNOMIAL: u32 = 0x04C1_1DB7;

/// Initial register value
pub const INITIAL: u32 = 0xFFFF_FFFF;

const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut mask = (i as u32) << 24;
        let mut j = 0;
        while j < 8 {
            if mask & 0x8000_0000 != 0 {
                mask = (mask << 1) ^ POLYNOMIAL;
            } else {
                mask <<= 1;
            }
            j += 1;
        }
        table[i] = mask;
        i += 1;
    }
    table
}

/// Byte-at-a-time lookup table
pub static TABLE: [u32; 256] = build_table();

/// Streaming checksum state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Crc32 {
    crc: u32,
}

impl Crc32 {
    pub const fn new() -> Self {
        Self { crc: INITIAL }
    }

    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            let index = ((self.crc >> 24) ^ byte as u32) as usize;
            self.crc = (self.crc << 8) ^ TABLE[index];
        }
    }

    #[inline]
    pub fn finalize(self) -> u32 {
        self.crc
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

/// Checksum of `data` in one call
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = Crc32::new();
    crc.update(data);
    crc.finalize()
}
