//! # RCW Format
//!
//! Core types for Reset Configuration Word images.
//!
//! ## Key Features
//! - Arbitrary-width RCW words (any multiple of 8 bits), MSB-first bit numbering
//! - Named bit-field layouts with duplicate and overlap detection
//! - Field values of any width, carried as `BigUint`
//! - PBI commands (`wait`, `write`, `awrite`, `flush`) as 8-byte records
//! - PBL framing: preamble, end command and a MSB-first CRC-32 trailer

pub mod bits;
pub mod checksum;
pub mod config;
pub mod error;
pub mod image;
pub mod layout;
pub mod number;
pub mod pbi;

pub use bits::BitWord;
pub use checksum::{crc32, Crc32};
pub use config::Variables;
pub use error::{RcwError, Result};
pub use image::{FormatMode, Preamble, END_COMMAND, PBL_MAGIC};
pub use layout::{Assignment, BitField, Layout};
pub use number::parse_number;
pub use pbi::PbiCommand;

pub use num_bigint::BigUint;
