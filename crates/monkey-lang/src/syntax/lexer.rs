use crate::syntax::token::{Token, TokenKind, lookup_ident};

pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0, line: 1, column: 1, finished: false }
    }

    /// Scan the whole input. The last token is always `Eof`.
    pub fn tokenize(self) -> Vec<Token> {
        self.collect()
    }

    /// Produce the next token. Keeps returning `Eof` once the input is exhausted.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let line = self.line;
        let col = self.column;
        let start = self.pos;

        let Some(ch) = self.advance() else {
            return Token::new(TokenKind::Eof, "", line, col);
        };

        let kind = match ch {
            '=' => if self.matches('=') { TokenKind::Eq } else { TokenKind::Assign },
            '!' => if self.matches('=') { TokenKind::NotEq } else { TokenKind::Bang },
            '&' => if self.matches('&') { TokenKind::And } else { TokenKind::Illegal },
            '|' => if self.matches('|') { TokenKind::Or } else { TokenKind::Illegal },
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Asterisk,
            '/' => TokenKind::Slash,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,

            '"' => return self.read_string(line, col),
            c if c.is_ascii_digit() => self.read_number(),
            c if c.is_alphabetic() => {
                self.read_ident();
                lookup_ident(&self.source[start..self.pos])
            }

            _ => TokenKind::Illegal,
        };

        Token::new(kind, &self.source[start..self.pos], line, col)
    }

    // ─── Primitives ──────────────────────────────────────────────────────────

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' { self.line += 1; self.column = 1; }
        else { self.column += 1; }
        Some(ch)
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        self.source[self.pos..].chars().nth(1)
    }

    fn matches(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) { self.advance(); true } else { false }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\r' | '\n')) {
            self.advance();
        }
    }

    // ─── Readers ─────────────────────────────────────────────────────────────

    /// Strings have no escapes. An unterminated string becomes an `Illegal`
    /// token holding everything from the opening quote to the end of input.
    fn read_string(&mut self, line: usize, col: usize) -> Token {
        let open = self.pos - 1;
        let content = self.pos;
        loop {
            match self.advance() {
                Some('"') => {
                    return Token::new(TokenKind::String, &self.source[content..self.pos - 1], line, col);
                }
                Some(_) => {}
                None => return Token::new(TokenKind::Illegal, &self.source[open..], line, col),
            }
        }
    }

    fn read_number(&mut self) -> TokenKind {
        self.skip_digits();
        // a `.` only belongs to the number when a digit follows it
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.skip_digits();
            TokenKind::Float
        } else {
            TokenKind::Int
        }
    }

    fn skip_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn read_ident(&mut self) {
        while self.peek().is_some_and(char::is_alphanumeric) {
            self.advance();
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    /// Yields every token including a single trailing `Eof`, then stops.
    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let tok = self.next_token();
        tracing::trace!(kind = %tok.kind, literal = %tok.literal, line = tok.line, "token");
        if tok.kind == TokenKind::Eof {
            self.finished = true;
        }
        Some(tok)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
