use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("could not read `{}`: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{count} parse error(s), nothing was evaluated")]
    Parse { count: usize },

    /// The error value itself was already printed by the driver.
    #[error("script stopped on a runtime error")]
    Runtime,

    #[error("console I/O failed: {0}")]
    Console(#[from] io::Error),
}

impl AppError {
    /// sysexits-style status for the process.
    pub fn exit_code(&self) -> ExitCode {
        let code: u8 = match self {
            Self::Parse { .. } => 65,
            Self::Runtime      => 70,
            Self::Read { .. } | Self::Console(_) => 74,
        };
        ExitCode::from(code)
    }
}
