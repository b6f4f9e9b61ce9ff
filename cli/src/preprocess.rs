//! Source loading through the C preprocessor
//!
//! RCW sources use `#include` and `#define`, so they are expanded with
//! `gcc -E -x c -P` before parsing.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};
use tracing::debug;

const PROGRAM: &str = "gcc";

#[derive(Debug, Clone)]
pub struct Preprocessor {
    include: Vec<PathBuf>,
    enabled: bool,
}

impl Preprocessor {
    pub fn new(include: Vec<PathBuf>, enabled: bool) -> Self {
        Self { include, enabled }
    }

    /// Arguments passed to gcc. `None` reads stdin.
    pub fn command_args(&self, input: Option<&Path>) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-E", "-x", "c", "-P", "-I", "."]
            .iter()
            .map(OsString::from)
            .collect();

        for dir in &self.include {
            args.push("-I".into());
            args.push(dir.as_os_str().to_owned());
        }

        args.push(match input {
            Some(path) => path.as_os_str().to_owned(),
            None => "-".into(),
        });
        args
    }

    /// Read and expand a source file (stdin for `None`)
    pub fn load(&self, input: Option<&Path>) -> Result<String> {
        if !self.enabled {
            return read_text(input);
        }

        let args = self.command_args(input);
        debug!("running {} {:?}", PROGRAM, args);

        let output = Command::new(PROGRAM)
            .args(&args)
            .stdin(Stdio::inherit())
            .output()
            .with_context(|| format!("Could not run {}", PROGRAM))?;

        if !output.status.success() {
            bail!(
                "Preprocessor failed:\n{}",
                String::from_utf8_lossy(&output.stderr).trim_end()
            );
        }

        String::from_utf8(output.stdout).context("Preprocessor output is not UTF-8")
    }
}

fn read_text(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Could not read stdin")?;
            Ok(text)
        }
    }
}
