use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Illegal,
    Eof,

    // Literals
    Ident,
    Int,
    Float,
    String,

    // Operators
    Assign,   // =
    Plus,     // +
    Minus,    // -
    Bang,     // !
    Asterisk, // *
    Slash,    // /
    Eq,       // ==
    NotEq,    // !=
    And,      // &&
    Or,       // ||
    Lt,       // <
    Gt,       // >

    // Punctuation
    Comma,     // ,
    Semicolon, // ;
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]

    // Keywords
    Function,
    Let,
    True,
    False,
    If,
    Else,
    While,
    Return,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Illegal   => "ILLEGAL",
            Self::Eof       => "EOF",
            Self::Ident     => "IDENT",
            Self::Int       => "INT",
            Self::Float     => "FLOAT",
            Self::String    => "STRING",
            Self::Assign    => "=",
            Self::Plus      => "+",
            Self::Minus     => "-",
            Self::Bang      => "!",
            Self::Asterisk  => "*",
            Self::Slash     => "/",
            Self::Eq        => "==",
            Self::NotEq     => "!=",
            Self::And       => "&&",
            Self::Or        => "||",
            Self::Lt        => "<",
            Self::Gt        => ">",
            Self::Comma     => ",",
            Self::Semicolon => ";",
            Self::LParen    => "(",
            Self::RParen    => ")",
            Self::LBrace    => "{",
            Self::RBrace    => "}",
            Self::LBracket  => "[",
            Self::RBracket  => "]",
            Self::Function  => "fn",
            Self::Let       => "let",
            Self::True      => "true",
            Self::False     => "false",
            Self::If        => "if",
            Self::Else      => "else",
            Self::While     => "while",
            Self::Return    => "return",
        };
        f.write_str(s)
    }
}

/// Resolve a scanned word against the keyword table.
pub fn lookup_ident(word: &str) -> TokenKind {
    match word {
        "fn"     => TokenKind::Function,
        "let"    => TokenKind::Let,
        "true"   => TokenKind::True,
        "false"  => TokenKind::False,
        "if"     => TokenKind::If,
        "else"   => TokenKind::Else,
        "while"  => TokenKind::While,
        "return" => TokenKind::Return,
        _        => TokenKind::Ident,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text of the token. For strings this is the content between the quotes.
    pub literal: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, line: usize, column: usize) -> Self {
        Self { kind, literal: literal.into(), line, column }
    }
}
