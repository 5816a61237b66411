//! Error types

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can end a passpipe run early
#[derive(Error, Debug)]
pub enum PasspipeError {
    /// The child ran and exited unsuccessfully. Displays as its stderr, verbatim.
    #[error("{stderr}")]
    ChildFailure { code: Option<i32>, stderr: String },

    #[error("failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("error executing command: {0}")]
    ExecutionFault(String),

    #[error("failed to read password: {0}")]
    Prompt(#[source] std::io::Error),

    #[error("invalid config at {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl PasspipeError {
    /// Exit status the parent process should terminate with
    pub fn exit_code(&self) -> i32 {
        1
    }
}

pub type Result<T> = std::result::Result<T, PasspipeError>;
