//! passpipe - Hand a password to a command without putting it on the command line
//!
//! "Type it once. Pipe it. Forget it."
//!
//! Prompts for a password with echo disabled, runs the given command with the
//! password as the first line of its standard input, then relays the
//! command's output and exit status. Arguments are passed through untouched,
//! no shell involved.

pub mod config;
pub mod error;
pub mod runner;
pub mod secret;

pub use config::Config;
pub use error::PasspipeError;
pub use runner::{ask_secret, run_command, CommandRunner, Invocation};
pub use secret::{
    prompt_for_secret, InteractivePrompt, ReaderPrompt, Secret, SecretSource, TerminalPrompt,
};
