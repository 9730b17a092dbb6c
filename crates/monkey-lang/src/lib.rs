pub mod syntax;
pub mod runtime;
pub mod error;

pub use error::{ParseError, ParseErrorKind};
pub use syntax::ast::Code;
pub use syntax::token::{Token, TokenKind};
pub use runtime::builtins::Builtins;
pub use runtime::environment::{Env, Environment};
pub use runtime::object::Object;

use std::rc::Rc;

use runtime::evaluator::Evaluator;
use syntax::parser::Parser;

// ─── Public API ───────────────────────────────────────────────────────────────

/// Parse source text. The tree is always returned; it is only meaningful when
/// the error list is empty.
pub fn parse(source: &str) -> (Code, Vec<ParseError>) {
    let mut parser = Parser::from_source(source);
    let code = parser.parse_program();
    (code, parser.into_errors())
}

// ─── Session ──────────────────────────────────────────────────────────────────

/// Top-level environment plus the builtin set, kept alive across inputs.
///
/// A REPL feeds every line into the same session so `let` bindings persist;
/// a file driver uses one session for the whole file.
pub struct Session {
    env: Env,
    evaluator: Evaluator,
}

impl Session {
    /// Fresh environment with the standard builtins.
    pub fn new() -> Self {
        Self::from_parts(Environment::new(), Builtins::standard())
    }

    /// Use a prepared environment and builtin set. Hosts that register
    /// builtins capturing the environment create it first and pass it here.
    pub fn from_parts(env: Env, builtins: Builtins) -> Self {
        Self { env, evaluator: Evaluator::new(Rc::new(builtins)) }
    }

    /// Evaluate an already parsed tree in the session environment.
    pub fn eval(&self, code: &Code) -> Object {
        self.evaluator.eval_code(code, &self.env)
    }

    /// Parse and evaluate. Nothing is evaluated when parsing fails.
    #[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
    pub fn eval_source(&self, source: &str) -> Result<Object, Vec<ParseError>> {
        let (code, errors) = parse(source);
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(self.eval(&code))
    }
}

impl Default for Session {
    fn default() -> Self { Self::new() }
}
