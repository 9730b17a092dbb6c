use thiserror::Error;

use crate::syntax::token::TokenKind;

/// What went wrong while parsing. Messages are shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("expected next token to be {expected}, got {found} instead")]
    UnexpectedToken { expected: TokenKind, found: TokenKind },

    #[error("no prefix parse function for {0} found")]
    NoPrefixRule(TokenKind),

    #[error("illegal token `{0}`")]
    IllegalToken(String),

    #[error("could not parse `{0}` as integer")]
    InvalidInteger(String),

    #[error("could not parse `{0}` as float")]
    InvalidFloat(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, line: usize, column: usize) -> Self {
        Self { kind, line, column }
    }
}
