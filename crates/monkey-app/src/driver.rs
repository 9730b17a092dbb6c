//! Runs one unit of source (a REPL line or a whole file) through a session
//! and prints what the user should see.

use std::fs;
use std::io;
use std::path::Path;

use monkey_lang::{Object, ParseError, Session};

use crate::error::AppError;
use crate::host::{Console, print_parse_errors};

#[derive(Debug, PartialEq)]
pub enum Outcome {
    Evaluated(Object),
    /// Parsing failed; the errors were printed and nothing ran.
    Rejected(Vec<ParseError>),
}

pub struct Driver {
    session: Session,
    console: Console,
    show_ast: bool,
}

impl Driver {
    pub fn new(session: Session, console: Console, show_ast: bool) -> Self {
        Self { session, console, show_ast }
    }

    pub fn console(&self) -> &Console { &self.console }

    /// Parse, optionally echo the tree, evaluate, and print the result.
    /// `null` results are not echoed.
    pub fn run(&self, source: &str) -> io::Result<Outcome> {
        let (code, errors) = monkey_lang::parse(source);
        if !errors.is_empty() {
            print_parse_errors(&self.console, &errors)?;
            return Ok(Outcome::Rejected(errors));
        }

        if self.show_ast {
            self.console.write_line(&code)?;
        }

        let result = self.session.eval(&code);
        if result != Object::Null {
            self.console.write_line(&result)?;
        }
        Ok(Outcome::Evaluated(result))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn run_file(&self, path: &Path) -> Result<(), AppError> {
        let source = fs::read_to_string(path)
            .map_err(|source| AppError::Read { path: path.to_path_buf(), source })?;

        match self.run(&source)? {
            Outcome::Rejected(errors) => Err(AppError::Parse { count: errors.len() }),
            Outcome::Evaluated(Object::Error(_)) => Err(AppError::Runtime),
            Outcome::Evaluated(_) => Ok(()),
        }
    }
}
