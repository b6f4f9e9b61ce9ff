//! Main assembler logic

use std::collections::HashMap;

use rcw_spec::image::END_COMMAND;
use rcw_spec::pbi::PBI_BLOCK;
use rcw_spec::{crc32, Assignment, BigUint, BitWord, Layout, PbiCommand, Preamble, RcwError, Variables};
use tracing::{debug, trace, warn};

use crate::encoder::encode_all;
use crate::error::{AssemblerError, AssemblyFailure, Diagnostic, Result};
use crate::parser::{parse_pbi_command, parse_statement, strip_whitespace, Statement};

/// Output options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssembleOptions {
    /// Wrap the RCW in the PBL preamble, end command and checksum
    pub pbl: bool,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self { pbl: true }
    }
}

/// Parser state
#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Normal,
    InBlock {
        header: String,
        line: usize,
        lines: Vec<(usize, Vec<String>)>,
    },
}

/// Everything a source file defines: the compilation context
#[derive(Debug, Clone, Default)]
pub struct Source {
    pub layout: Layout,
    pub vars: Variables,
    /// Assignments in source order, each with its line number
    pub assignments: Vec<(usize, Assignment)>,
    /// PBI commands of all blocks, in source order
    pub pbi: Vec<PbiCommand>,
    /// Recoverable problems found while parsing
    pub diagnostics: Vec<Diagnostic>,
    assigned: HashMap<String, usize>,
    unterminated: Option<(String, usize)>,
}

impl Source {
    /// Parse already-preprocessed source text
    pub fn parse(text: &str) -> Self {
        parse_source(text.lines())
    }

    /// Fail if the source ended inside a block
    pub fn check(&self) -> Result<()> {
        match &self.unterminated {
            Some((header, line)) => Err(AssemblerError::UnterminatedBlock {
                header: header.clone(),
                line: *line,
            }),
            None => Ok(()),
        }
    }

    /// Value assigned to `name`, if any
    pub fn value(&self, name: &str) -> Option<&BigUint> {
        self.assigned.get(name).map(|&i| &self.assignments[i].1.value)
    }

    fn report(&mut self, line: usize, error: impl Into<AssemblerError>) {
        let diag = Diagnostic::new(Some(line), error);
        warn!("{}", diag);
        self.diagnostics.push(diag);
    }

    fn statement(&mut self, line: usize, statement: Statement) {
        match statement {
            // Handled by the block state machine
            Statement::Directive(_) => {}
            Statement::Variable { key, value } => {
                trace!(line, %key, %value, "variable");
                self.vars.set(key, value);
            }
            Statement::Field { name, begin, end } => {
                trace!(line, %name, begin, end, "field");
                if let Err(e) = self.layout.define(&name, begin, end) {
                    self.report(line, e);
                }
            }
            Statement::Assignment { name, value } => {
                trace!(line, %name, %value, "assignment");
                if !self.layout.contains(&name) {
                    self.report(line, RcwError::UnknownField(name));
                } else if self.assigned.contains_key(&name) {
                    self.report(line, AssemblerError::DuplicateAssignment(name));
                } else {
                    self.assigned.insert(name.clone(), self.assignments.len());
                    self.assignments.push((line, Assignment::new(name, value)));
                }
            }
        }
    }

    /// Encode a finished block; any bad command discards the whole block
    fn close_block(&mut self, header: String, line: usize, lines: Vec<(usize, Vec<String>)>) {
        if header != PBI_BLOCK {
            self.report(line, AssemblerError::UnknownBlock(header));
            return;
        }

        let mut commands = Vec::with_capacity(lines.len());
        for (line, tokens) in &lines {
            match parse_pbi_command(tokens.as_slice()) {
                Ok(command) => commands.push(command),
                Err(e) => {
                    self.report(*line, e);
                    return;
                }
            }
        }

        debug!(line, count = commands.len(), "PBI block");
        self.pbi.extend(commands);
    }
}

/// Parse preprocessed lines into a [`Source`].
///
/// Parsing never stops early: recoverable problems are collected in
/// [`Source::diagnostics`], and an unterminated block is reported by
/// [`Source::check`].
pub fn parse_source<I, S>(lines: I) -> Source
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut source = Source::default();
    let mut state = State::Normal;

    for (index, raw) in lines.into_iter().enumerate() {
        let line = index + 1;
        let raw = raw.as_ref();

        // Skip blank or comment-only lines
        if strip_whitespace(raw).is_empty() {
            continue;
        }

        let statement = match parse_statement(raw) {
            Ok(statement) => statement,
            Err(_) if matches!(state, State::InBlock { .. }) => None,
            Err(e) => {
                source.report(line, e);
                continue;
            }
        };

        state = match (state, statement) {
            (State::Normal, Some(Statement::Directive(header))) => {
                debug!(line, %header, "entering subsection");
                State::InBlock {
                    header,
                    line,
                    lines: Vec::new(),
                }
            }
            (State::InBlock { header, line: start, lines }, Some(Statement::Directive(_))) => {
                debug!(line, %header, "leaving subsection");
                source.close_block(header, start, lines);
                State::Normal
            }
            (State::InBlock { header, line: start, mut lines }, _) => {
                lines.push((line, raw.split_whitespace().map(str::to_string).collect()));
                State::InBlock {
                    header,
                    line: start,
                    lines,
                }
            }
            (State::Normal, Some(statement)) => {
                source.statement(line, statement);
                State::Normal
            }
            (State::Normal, None) => State::Normal,
        };
    }

    if let State::InBlock { header, line, .. } = state {
        warn!(line, %header, "unterminated subsection");
        source.unterminated = Some((header, line));
    }

    source
}

/// A compiled image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    pub bytes: Vec<u8>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Build the binary image of a parsed source.
///
/// Fatal problems (no `%size`, bad `%size`, PBL without `%sysaddr`,
/// unterminated block) return an error and no image. Assignments that do
/// not fit their field are reported in [`Assembly::diagnostics`] and leave
/// the field zero.
pub fn build_image(source: &Source, options: &AssembleOptions) -> Result<Assembly> {
    source.check()?;

    let size = source.vars.size()?;
    let preamble = if options.pbl {
        let sysaddr = source.vars.sysaddr()?.ok_or(RcwError::MissingSysaddr)?;
        Some(Preamble::new(size, sysaddr))
    } else {
        None
    };

    let mut diagnostics = Vec::new();
    let mut word = BitWord::new(size)?;
    for (line, assignment) in &source.assignments {
        let result = source
            .layout
            .get(&assignment.name)
            .and_then(|field| word.insert(field, &assignment.value));

        if let Err(e) = result {
            let diag = Diagnostic::new(Some(*line), e);
            warn!("{}", diag);
            diagnostics.push(diag);
        }
    }

    let mut bytes = Vec::new();
    if let Some(preamble) = &preamble {
        debug!(length = preamble.length, "PBL preamble");
        bytes.extend_from_slice(&preamble.to_bytes());
    }

    bytes.extend_from_slice(word.as_bytes());
    bytes.extend_from_slice(&encode_all(&source.pbi));

    if preamble.is_some() {
        bytes.extend_from_slice(&END_COMMAND.to_be_bytes());
        let crc = crc32(&bytes);
        debug!("PBL checksum {:#010x}", crc);
        bytes.extend_from_slice(&crc.to_be_bytes());
    }

    Ok(Assembly { bytes, diagnostics })
}

/// Assemble preprocessed source text into an image.
///
/// The returned diagnostics include both parse-time and encode-time
/// problems. On a fatal error the parse-time diagnostics travel with it in
/// the [`AssemblyFailure`].
pub fn assemble(text: &str, options: &AssembleOptions) -> std::result::Result<Assembly, AssemblyFailure> {
    let source = Source::parse(text);
    let mut diagnostics = source.diagnostics.clone();

    match build_image(&source, options) {
        Ok(mut assembly) => {
            diagnostics.append(&mut assembly.diagnostics);
            assembly.diagnostics = diagnostics;
            Ok(assembly)
        }
        Err(error) => Err(AssemblyFailure { error, diagnostics }),
    }
}
