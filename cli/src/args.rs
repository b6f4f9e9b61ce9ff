//! Command-line arguments

use std::path::PathBuf;

use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(
    name = "rcw",
    version,
    about = "Compile RCW source files into RCW/PBL binaries, or recover source from a binary"
)]
pub struct Args {
    /// Input file. Defaults to stdin
    #[arg(short = 'i', value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout
    #[arg(short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Do not generate the PBL preamble and end command
    #[arg(long = "no-pbl", action = ArgAction::SetTrue)]
    pub no_pbl: bool,

    /// Generate a source file from a binary. Requires --rcwi
    #[arg(short = 'r', action = ArgAction::SetTrue, requires = "rcwi")]
    pub reverse: bool,

    /// RCWI definition file, used with -r
    #[arg(long = "rcwi", value_name = "FILE")]
    pub rcwi: Option<PathBuf>,

    /// Include path for the preprocessor. Can be given multiple times
    #[arg(short = 'I', value_name = "DIR", action = ArgAction::Append)]
    pub include: Vec<PathBuf>,

    /// Read source files verbatim instead of running the C preprocessor
    #[arg(long = "no-cpp", action = ArgAction::SetTrue)]
    pub no_cpp: bool,

    /// Log parser and framing details
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    pub verbose: bool,
}

impl Args {
    /// Default tracing filter when `RUST_LOG` is unset
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}
