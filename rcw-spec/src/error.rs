//! # Error Types for RCW layouts and images

use num_bigint::BigUint;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RcwError {
    // Configuration errors
    #[error("\"%size\" variable must be specified")]
    MissingSize,

    #[error("Invalid word size {0:?}: must be a positive multiple of 8")]
    InvalidSize(String),

    #[error("PBL format requires %sysaddr to be defined")]
    MissingSysaddr,

    #[error("Invalid %sysaddr {0:?}: expected an even number of hex digits")]
    InvalidSysaddr(String),

    // Layout errors
    #[error("Duplicate bitfield definition for {0}")]
    DuplicateField(String),

    #[error("Bitfield {name} overlaps with {other}")]
    Overlap { name: String, other: String },

    #[error("Bitfield {name} has begin {begin} after end {end}")]
    InvalidRange { name: String, begin: usize, end: usize },

    #[error("Unknown bitfield {0}")]
    UnknownField(String),

    // Value errors
    #[error("Value {value} is too large for field {name} ({width} bits)")]
    WidthOverflow { name: String, value: BigUint, width: usize },

    #[error("Bitfield {name} ends at bit {end}, outside a {size}-bit word")]
    FieldOutOfRange { name: String, end: usize, size: usize },

    // Image errors
    #[error("Image truncated: expected at least {expected} bytes, found {found}")]
    Truncated { expected: usize, found: usize },
}

impl RcwError {
    /// Check if this error aborts the whole compilation
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RcwError::MissingSize
                | RcwError::InvalidSize(_)
                | RcwError::MissingSysaddr
                | RcwError::InvalidSysaddr(_)
                | RcwError::Truncated { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, RcwError>;
