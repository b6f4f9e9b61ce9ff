//! Disassembler errors

use rcw_spec::RcwError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisassemblerError {
    #[error(transparent)]
    Rcw(#[from] RcwError),

    #[error("Bad PBL magic: {0:02X?}")]
    BadMagic([u8; 4]),

    #[error("PBL length byte is 0x{found:02X}, expected 0x{expected:02X}")]
    LengthMismatch { found: u8, expected: u8 },

    #[error("No PBL end command after the RCW word")]
    MissingEndCommand,

    #[error("Checksum mismatch: image has 0x{found:08X}, computed 0x{computed:08X}")]
    ChecksumMismatch { found: u32, computed: u32 },

    #[error("Unknown PBI command word: 0x{0:08X}")]
    UnknownCommand(u32),

    #[error("PBI region of {0} bytes is not a whole number of commands")]
    RaggedPbi(usize),
}

impl DisassemblerError {
    /// Fatal errors abort disassembly; everything else is a warning
    pub fn is_fatal(&self) -> bool {
        match self {
            DisassemblerError::Rcw(err) => err.is_fatal(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, DisassemblerError>;
