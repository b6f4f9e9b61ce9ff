//! RCW source line parser
//!
//! Each line is classified by the first rule in [`Rule::ALL`] that accepts
//! it. Lines inside a PBI block never reach this classifier except for the
//! closing delimiter; the assembler handles block state.

use rcw_spec::{parse_number, BigUint, PbiCommand};
use rcw_spec::pbi::ADDR_MASK;

use crate::error::{AssemblerError, Result};
use crate::lexer::{tokenize, Token};

/// One classified source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `.name`: opens or closes a block
    Directive(String),
    /// `%key=value`
    Variable { key: String, value: String },
    /// `NAME[pos]` or `NAME[begin:end]`
    Field { name: String, begin: usize, end: usize },
    /// `NAME=value`
    Assignment { name: String, value: BigUint },
}

/// Line classification rules, highest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Directive,
    Variable,
    SingleBitField,
    RangedField,
    Assignment,
}

impl Rule {
    pub const ALL: [Rule; 5] = [
        Rule::Directive,
        Rule::Variable,
        Rule::SingleBitField,
        Rule::RangedField,
        Rule::Assignment,
    ];

    /// Try this rule on a whitespace-free line.
    ///
    /// `None` means the rule does not apply; `Some(Err(..))` means it
    /// applies but the line is malformed (e.g. a bad number).
    fn apply(self, text: &str, tokens: Option<&[Token]>) -> Option<Result<Statement>> {
        match (self, tokens) {
            (Rule::Variable, _) => parse_variable(text).map(Ok),
            (Rule::Directive, Some([Token::Directive(name)])) => {
                Some(Ok(Statement::Directive(name.clone())))
            }
            (
                Rule::SingleBitField,
                Some([Token::Word(name), Token::LBracket, Token::Word(pos), Token::RBracket]),
            ) => Some(parse_position(pos).map(|pos| Statement::Field {
                name: name.clone(),
                begin: pos,
                end: pos,
            })),
            (
                Rule::RangedField,
                Some(
                    [Token::Word(name), Token::LBracket, Token::Word(begin), Token::Colon, Token::Word(end), Token::RBracket],
                ),
            ) => Some(parse_position(begin).and_then(|begin| {
                Ok(Statement::Field {
                    name: name.clone(),
                    begin,
                    end: parse_position(end)?,
                })
            })),
            (Rule::Assignment, Some([Token::Word(name), Token::Equals, Token::Word(value)])) => {
                Some(parse_value(value).map(|value| Statement::Assignment {
                    name: name.clone(),
                    value,
                }))
            }
            _ => None,
        }
    }
}

/// Remove all whitespace from a line
pub fn strip_whitespace(line: &str) -> String {
    line.split_whitespace().collect()
}

/// Classify a single source line.
///
/// Returns `Ok(None)` for blank lines.
pub fn parse_statement(line: &str) -> Result<Option<Statement>> {
    let text = strip_whitespace(line);
    if text.is_empty() {
        return Ok(None);
    }

    let tokens = tokenize(&text);
    Rule::ALL
        .iter()
        .find_map(|rule| rule.apply(&text, tokens.as_deref()))
        .unwrap_or_else(|| Err(AssemblerError::SyntaxError(line.split_whitespace().collect::<Vec<_>>().join(" "))))
        .map(Some)
}

/// Which rule claims a line, if any (blank lines and malformed lines
/// return `None`)
pub fn classify(line: &str) -> Option<Rule> {
    let text = strip_whitespace(line);
    let tokens = tokenize(&text);
    Rule::ALL
        .iter()
        .copied()
        .find(|rule| rule.apply(&text, tokens.as_deref()).is_some())
}

fn parse_variable(text: &str) -> Option<Statement> {
    let (key, value) = text.strip_prefix('%')?.split_once('=')?;
    let key_ok = !key.is_empty() && key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_');
    if !key_ok || value.is_empty() {
        return None;
    }

    Some(Statement::Variable {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Parse a numeric literal (`0x` hex, `0b` binary, `0` octal, decimal) of
/// any length
pub fn parse_value(text: &str) -> Result<BigUint> {
    parse_number(text).ok_or_else(|| AssemblerError::InvalidNumber(text.to_string()))
}

fn parse_position(text: &str) -> Result<usize> {
    parse_value(text)
        .and_then(|v| usize::try_from(v).map_err(|_| AssemblerError::InvalidNumber(text.to_string())))
}

/// Parse one PBI command from the whitespace-separated tokens of a line.
///
/// Mnemonics are case-sensitive: `wait`, `write`, `awrite` and `flush`.
/// Data operands must fit in 32 bits. The address of `write` and `awrite`
/// must fit in 24 bits, since it shares its word with the 8-bit opcode.
pub fn parse_pbi_command<S: AsRef<str>>(tokens: &[S]) -> Result<PbiCommand> {
    let Some((mnemonic, operands)) = tokens.split_first() else {
        return Err(AssemblerError::UnknownInstruction(String::new()));
    };
    let mnemonic = mnemonic.as_ref();
    let operands: Vec<&str> = operands.iter().map(AsRef::as_ref).collect();

    match mnemonic {
        "wait" => {
            let [cycles] = expect_operands::<1>(mnemonic, &operands)?;
            Ok(PbiCommand::Wait {
                cycles: parse_word(mnemonic, cycles)?,
            })
        }
        "write" | "awrite" => {
            let [addr, value] = expect_operands::<2>(mnemonic, &operands)?;
            let addr = parse_address(mnemonic, addr)?;
            let value = parse_word(mnemonic, value)?;
            if mnemonic == "write" {
                Ok(PbiCommand::Write { addr, value })
            } else {
                Ok(PbiCommand::AWrite { addr, value })
            }
        }
        "flush" => {
            expect_operands::<0>(mnemonic, &operands)?;
            Ok(PbiCommand::Flush)
        }
        _ => Err(AssemblerError::UnknownInstruction(mnemonic.to_string())),
    }
}

fn expect_operands<'a, const N: usize>(mnemonic: &str, operands: &[&'a str]) -> Result<[&'a str; N]> {
    <[&str; N]>::try_from(operands).map_err(|_| AssemblerError::InvalidOperand {
        instruction: mnemonic.to_string(),
        message: format!("expected {} operand(s), found {}", N, operands.len()),
    })
}

fn parse_word(mnemonic: &str, text: &str) -> Result<u32> {
    parse_number(text)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| AssemblerError::InvalidOperand {
            instruction: mnemonic.to_string(),
            message: format!("{} is not a 32-bit value", text),
        })
}

fn parse_address(mnemonic: &str, text: &str) -> Result<u32> {
    parse_word(mnemonic, text)
        .ok()
        .filter(|addr| addr & !ADDR_MASK == 0)
        .ok_or_else(|| AssemblerError::InvalidOperand {
            instruction: mnemonic.to_string(),
            message: format!("{} is not a 24-bit address", text),
        })
}
