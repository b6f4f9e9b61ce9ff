//! RCW Assembler
//!
//! Compile preprocessed RCW source text into an RCW or PBL binary image.
//!
//! ## Example
//!
//! ```rust
//! use rcw_assembler::{assemble, AssembleOptions};
//!
//! let source = r#"
//!     %size=8
//!     A[0:3]
//!     B[4:7]
//!     A=5
//!     B=2
//! "#;
//!
//! let assembly = assemble(source, &AssembleOptions { pbl: false }).unwrap();
//! assert_eq!(assembly.bytes, vec![0x52]);
//! ```

pub mod error;
pub mod lexer;
pub mod parser;
pub mod encoder;
pub mod assembler;

pub use error::{AssemblerError, AssemblyFailure, Diagnostic, Result};
pub use assembler::{assemble, build_image, parse_source, AssembleOptions, Assembly, Source};
pub use parser::{parse_pbi_command, parse_statement, Statement};
pub use encoder::encode;
