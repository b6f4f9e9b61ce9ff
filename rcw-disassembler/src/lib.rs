//! # RCW Disassembler
//!
//! Recover `NAME=value` assignments from an RCW or PBL binary image, given
//! the field layout the image was built from.
//!
//! ## Format Modes
//!
//! - **Raw**: the image is the RCW word alone
//! - **PBL**: `[preamble][word][pbi commands][end command][checksum]`
//!
//! [`rcw_spec::FormatMode::detect()`] picks the mode from the image length.
//! PBL framing problems (bad magic, wrong checksum) are reported as warnings;
//! the word is still decoded.
//!
//! ## Example
//!
//! ```rust
//! use rcw_assembler::Source;
//! use rcw_disassembler::{disassemble, format_source};
//!
//! let layout = Source::parse("%size=8\nA[0:3]\nB[4:7]\n");
//! let disassembly = disassemble(&[0x52], &layout.layout, &layout.vars).unwrap();
//!
//! assert_eq!(format_source(&disassembly, None), "A=5\nB=2\n");
//! ```

pub mod error;
pub mod decoder;
pub mod formatter;
pub mod disassembler;

pub use error::{DisassemblerError, Result};
pub use disassembler::{disassemble, Disassembly};
pub use decoder::{decode, decode_all};
pub use formatter::{format_command, format_residual, format_source};
