use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use monkey_lang::{Builtins, Environment, Session};

mod driver;
mod error;
mod host;
mod repl;

use driver::Driver;
use error::AppError;
use host::Console;

/// Interpreter for the Monkey scripting language. Without a file it starts
/// an interactive session.
#[derive(Parser, Debug)]
#[command(name = "monkey", version, about, long_about = None)]
struct Args {
    /// Script to execute instead of starting the REPL.
    file: Option<PathBuf>,

    /// Print the canonical rendering of each parsed input before evaluating it.
    #[arg(long)]
    ast: bool,

    /// Only register the core builtins; no console or file access from scripts.
    #[arg(long)]
    no_host: bool,
}

/// Log to stderr, and only when `RUST_LOG` is set, so script output stays clean.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn build_driver(args: &Args, console: Console) -> Driver {
    let env = Environment::new();
    let mut builtins = Builtins::standard();
    if !args.no_host {
        host::register(&mut builtins, &console, &env);
    }
    Driver::new(Session::from_parts(env, builtins), console, args.ast)
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();
    tracing::debug!(?args, "starting");

    let driver = build_driver(&args, Console::stdio());
    let result = match &args.file {
        Some(path) => driver.run_file(path),
        None => repl::start(&driver).map_err(AppError::from),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("monkey: {e}");
            e.exit_code()
        }
    }
}
