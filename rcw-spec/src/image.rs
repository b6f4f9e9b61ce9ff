//! # RCW/PBL Image Format
//!
//! A bare RCW image is just the packed word. With PBL framing the image is:
//!
//! ```text
//! Offset        Size      Field
//! ───────────────────────────────────────────────
//! 0x00          4         magic (AA 55 AA 55)
//! 0x04          1         length byte ((size/8 & 0x3F) << 1 | 1)
//! 0x05          n         %sysaddr bytes
//! 0x05 + n      size/8    RCW word
//! ...           8 × k     PBI commands
//! ...           4         end command (08 13 80 40)
//! ...           4         checksum of everything before it (big-endian)
//! ```

/// PBL preamble magic
pub const PBL_MAGIC: [u8; 4] = [0xAA, 0x55, 0xAA, 0x55];

/// PBL end command
pub const END_COMMAND: u32 = 0x0813_8040;

/// Where a framed image's RCW word starts when the sysaddr width is unknown
/// (the usual 3-byte system address)
pub const DEFAULT_WORD_OFFSET: usize = 8;

/// End command plus checksum
pub const TRAILER_SIZE: usize = 8;

/// Length byte of the PBL preamble for a `size`-bit RCW
#[inline]
pub const fn length_byte(size: usize) -> u8 {
    ((((size / 8) & 0x3F) << 1) | 1) as u8
}

/// Image framing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatMode {
    /// The RCW word alone
    Raw,
    /// Preamble, word, PBI commands, end command and checksum
    Pbl,
}

impl FormatMode {
    /// Guess the framing of an image from its length.
    ///
    /// Anything longer than the RCW word is assumed to carry PBL framing.
    pub fn detect(image: &[u8], size: usize) -> Self {
        if image.len() * 8 > size {
            FormatMode::Pbl
        } else {
            FormatMode::Raw
        }
    }
}

/// PBL preamble
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preamble {
    pub length: u8,
    pub sysaddr: Vec<u8>,
}

impl Preamble {
    pub fn new(size: usize, sysaddr: Vec<u8>) -> Self {
        Self {
            length: length_byte(size),
            sysaddr,
        }
    }

    /// Encoded size in bytes
    pub fn len(&self) -> usize {
        PBL_MAGIC.len() + 1 + self.sysaddr.len()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.len());
        bytes.extend_from_slice(&PBL_MAGIC);
        bytes.push(self.length);
        bytes.extend_from_slice(&self.sysaddr);
        bytes
    }
}
