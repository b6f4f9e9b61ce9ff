//! `rcw`: compile RCW source into RCW/PBL binaries, or decompile them

mod args;
mod preprocess;

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rcw_assembler::{build_image, AssembleOptions, Source};
use rcw_disassembler::{disassemble, format_residual, format_source};

use crate::args::Args;
use crate::preprocess::Preprocessor;

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let cpp = Preprocessor::new(args.include.clone(), !args.no_cpp);

    if args.reverse {
        decompile(args, &cpp)
    } else {
        compile(args, &cpp)
    }
}

fn compile(args: &Args, cpp: &Preprocessor) -> Result<()> {
    let text = cpp.load(args.input.as_deref())?;
    let source = Source::parse(&text);

    let options = AssembleOptions { pbl: !args.no_pbl };
    let assembly = build_image(&source, &options)?;

    let errors = source.diagnostics.len() + assembly.diagnostics.len();
    if errors > 0 {
        info!("{} error(s) reported", errors);
    }

    write_output(args.output.as_deref(), &assembly.bytes)
}

fn decompile(args: &Args, cpp: &Preprocessor) -> Result<()> {
    // `requires = "rcwi"` on -r guarantees the layout file
    let rcwi = args.rcwi.as_deref().context("-r requires --rcwi")?;
    let layout = Source::parse(&cpp.load(Some(rcwi))?);
    layout.check()?;

    let image = read_binary(args.input.as_deref())?;
    let disassembly = disassemble(&image, &layout.layout, &layout.vars)?;

    if let Some(message) = format_residual(&disassembly.residual_bits) {
        eprintln!("{}", message);
    }

    let include = rcwi
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    let text = format_source(&disassembly, include.as_deref());

    write_output(args.output.as_deref(), text.as_bytes())
}

fn read_binary(input: Option<&Path>) -> Result<Vec<u8>> {
    match input {
        Some(path) => fs::read(path).with_context(|| format!("Could not read {}", path.display())),
        None => {
            let mut bytes = Vec::new();
            io::stdin().read_to_end(&mut bytes).context("Could not read stdin")?;
            Ok(bytes)
        }
    }
}

fn write_output(output: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, bytes).with_context(|| format!("Could not write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(bytes).context("Could not write stdout")?;
            stdout.flush().context("Could not write stdout")
        }
    }
}
