//! # Lexer for RCW source lines
//!
//! Lines are lexed after all whitespace has been removed, so `NAME [ 3 : 5 ]`
//! and `NAME[3:5]` produce the same tokens.

use logos::Logos;

/// Tokens of an RCW source line
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    /// Block delimiter (.pbi, .end)
    #[regex(r"\.[a-zA-Z]+", |lex| lex.slice()[1..].to_string())]
    Directive(String),

    /// Field name or numeric literal; numbers are interpreted by the parser
    #[regex(r"[a-zA-Z0-9_]+", |lex| lex.slice().to_string())]
    Word(String),

    /// Variable marker
    #[token("%")]
    Percent,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(":")]
    Colon,

    #[token("=")]
    Equals,
}

/// Lex a whole line, or `None` if it contains a character the grammar
/// does not use
pub fn tokenize(text: &str) -> Option<Vec<Token>> {
    Token::lexer(text).collect::<Result<Vec<_>, _>>().ok()
}
