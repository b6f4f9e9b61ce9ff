//! # PBI Commands
//!
//! Pre-boot initialization commands live in a `.pbi` … `.end` block of the
//! source file. Each one is stored in the image as two big-endian 32-bit
//! words:
//!
//! ```text
//! Command          Word 0                 Word 1
//! ──────────────────────────────────────────────────
//! wait <n>         0x091380C0             n
//! write <a> <v>    0x09000000 | a         v
//! awrite <a> <v>   0x89000000 | a         v
//! flush            0x09138000             0
//! ```

/// Size of one encoded command in bytes
pub const COMMAND_SIZE: usize = 8;

/// Opcode word for `wait`
pub const WAIT_OPCODE: u32 = 0x0913_80C0;

/// Opcode word for `flush`
pub const FLUSH_OPCODE: u32 = 0x0913_8000;

/// Base opcode word for `write`; the low 24 bits hold the address
pub const WRITE_OPCODE: u32 = 0x0900_0000;

/// Base opcode word for `awrite` (ACS bit set)
pub const AWRITE_OPCODE: u32 = 0x8900_0000;

/// Mask selecting the address bits of a write opcode word
pub const ADDR_MASK: u32 = 0x00FF_FFFF;

/// Mask selecting the command bits of a write opcode word
pub const OPCODE_MASK: u32 = 0xFF00_0000;

/// Header of the only block kind the source format knows
pub const PBI_BLOCK: &str = "pbi";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PbiCommand {
    /// Wait `cycles` clock cycles
    Wait { cycles: u32 },

    /// Write `value` to the 24-bit address `addr`
    Write { addr: u32, value: u32 },

    /// Write with the ACS bit set
    AWrite { addr: u32, value: u32 },

    /// Read back the address of the previous write
    Flush,
}

impl PbiCommand {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            PbiCommand::Wait { .. } => "wait",
            PbiCommand::Write { .. } => "write",
            PbiCommand::AWrite { .. } => "awrite",
            PbiCommand::Flush => "flush",
        }
    }

    /// The `(opcode_word, value_word)` pair stored in the image
    pub fn words(&self) -> (u32, u32) {
        match *self {
            PbiCommand::Wait { cycles } => (WAIT_OPCODE, cycles),
            PbiCommand::Write { addr, value } => (WRITE_OPCODE | (addr & ADDR_MASK), value),
            PbiCommand::AWrite { addr, value } => (AWRITE_OPCODE | (addr & ADDR_MASK), value),
            PbiCommand::Flush => (FLUSH_OPCODE, 0),
        }
    }
}
