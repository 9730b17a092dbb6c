//! Host I/O builtins: `put`, `get`, `read`, `write`, `clear`.
//!
//! These live outside `monkey-lang` so the interpreter core never touches the
//! terminal or the filesystem on its own. Console access goes through
//! `Console`, which tests point at in-memory buffers.

use std::cell::RefCell;
use std::fmt::Display;
use std::fs;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use monkey_lang::runtime::builtins::{Builtins, as_str, check_argc};
use monkey_lang::runtime::evaluator::Evaluator;
use monkey_lang::runtime::object::NULL;
use monkey_lang::{Env, Object, ParseError};

// ─── Console ──────────────────────────────────────────────────────────────────

/// Shared line-oriented input and output. Cloning shares the same streams.
#[derive(Clone)]
pub struct Console {
    input: Rc<RefCell<dyn BufRead>>,
    output: Rc<RefCell<dyn Write>>,
}

impl Console {
    pub fn new(input: Rc<RefCell<dyn BufRead>>, output: Rc<RefCell<dyn Write>>) -> Self {
        Self { input, output }
    }

    pub fn stdio() -> Self {
        Self::new(Rc::new(RefCell::new(io::stdin().lock())), Rc::new(RefCell::new(io::stdout())))
    }

    /// Next line without its terminator, or `None` at end of input.
    pub fn read_line(&self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.borrow_mut().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(len);
        Ok(Some(line))
    }

    pub fn write_line(&self, text: impl Display) -> io::Result<()> {
        writeln!(self.output.borrow_mut(), "{text}")
    }

    /// Write without a newline and flush, for prompts.
    pub fn write(&self, text: impl Display) -> io::Result<()> {
        let mut out = self.output.borrow_mut();
        write!(out, "{text}")?;
        out.flush()
    }
}

pub fn print_parse_errors(console: &Console, errors: &[ParseError]) -> io::Result<()> {
    console.write_line("Parser errors:")?;
    for e in errors {
        console.write_line(format_args!("\t{e}"))?;
    }
    Ok(())
}

// ─── Builtins ─────────────────────────────────────────────────────────────────

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

fn io_failure(e: io::Error) -> String {
    format!("console I/O failed: {e}")
}

/// Add the host builtins to `builtins`. `get` evaluates what it reads in
/// `env`, so pass the session's top-level environment.
pub fn register(builtins: &mut Builtins, console: &Console, env: &Env) {
    let out = console.clone();
    builtins.define("put", move |args| {
        for arg in args {
            out.write_line(arg).map_err(io_failure)?;
        }
        Ok(NULL)
    });

    let con = console.clone();
    let env = Rc::clone(env);
    builtins.define("get", move |args| {
        check_argc(args, 0)?;
        let Some(line) = con.read_line().map_err(io_failure)? else {
            return Ok(NULL);
        };
        let (code, errors) = monkey_lang::parse(&line);
        if !errors.is_empty() {
            print_parse_errors(&con, &errors).map_err(io_failure)?;
            return Ok(NULL);
        }
        Ok(Evaluator::new(Rc::new(Builtins::standard())).eval_code(&code, &env))
    });

    builtins.define("read", |args| {
        check_argc(args, 1)?;
        let path = as_str("read", &args[0])?;
        tracing::debug!(path, "read");
        fs::read_to_string(path)
            .map(Object::String)
            .map_err(|e| format!("could not read `{path}`: {e}"))
    });

    builtins.define("write", |args| {
        check_argc(args, 2)?;
        let path = as_str("write", &args[0])?;
        tracing::debug!(path, "write");
        fs::write(path, args[1].to_string()).map_err(|e| format!("could not write `{path}`: {e}"))?;
        Ok(NULL)
    });

    let con = console.clone();
    builtins.define("clear", move |args| {
        check_argc(args, 0)?;
        con.write(CLEAR_SCREEN).map_err(io_failure)?;
        Ok(NULL)
    });
}
