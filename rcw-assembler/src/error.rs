//! Assembler errors

use std::fmt;

use rcw_spec::RcwError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblerError {
    #[error(transparent)]
    Rcw(#[from] RcwError),

    #[error("Unknown command: {0}")]
    SyntaxError(String),

    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error("Duplicate assignment for bitfield {0}")]
    DuplicateAssignment(String),

    #[error("Unknown subsection \"{0}\"")]
    UnknownBlock(String),

    #[error("Subsection \"{header}\" opened at line {line} is never closed")]
    UnterminatedBlock { header: String, line: usize },

    #[error("Unknown PBI subsection command \"{0}\"")]
    UnknownInstruction(String),

    #[error("Invalid operands for \"{instruction}\": {message}")]
    InvalidOperand { instruction: String, message: String },
}

impl AssemblerError {
    /// Check if this error aborts the whole compilation
    pub fn is_fatal(&self) -> bool {
        match self {
            AssemblerError::Rcw(e) => e.is_fatal(),
            AssemblerError::UnterminatedBlock { .. } => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, AssemblerError>;

/// A fatal error together with the diagnostics reported before it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{error}")]
pub struct AssemblyFailure {
    pub error: AssemblerError,
    pub diagnostics: Vec<Diagnostic>,
}

/// A recoverable problem found while compiling, with its source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based source line, if the problem can be tied to one
    pub line: Option<usize>,
    pub error: AssemblerError,
}

impl Diagnostic {
    pub fn new(line: Option<usize>, error: impl Into<AssemblerError>) -> Self {
        Self {
            line,
            error: error.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "Error on line {}: {}", line, self.error),
            None => write!(f, "Error: {}", self.error),
        }
    }
}
