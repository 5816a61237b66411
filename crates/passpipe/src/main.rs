//! passpipe - Pipe a prompted password into a command
//!
//! Usage:
//!   passpipe <COMMAND> [ARGS]...
//!
//! Prompts for a password (not echoed), runs COMMAND with ARGS and the
//! password as the first line of its stdin, then prints the command's stdout.
//! If the command fails, prints `Error: ` and its stderr to stdout and exits 1.
//! Faults of passpipe itself (launch, prompt, config) go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use passpipe::{ask_secret, run_command, CommandRunner, Config, InteractivePrompt, PasspipeError};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "passpipe")]
#[command(about = "Prompt for a password and pipe it into a command's standard input")]
#[command(version)]
#[command(after_help = r#"EXAMPLES:
    passpipe ./target/release/cli_wrapper my_key balance
    passpipe gpg --batch --passphrase-fd 0 --decrypt notes.gpg

SECURITY:
    - The password is read without echo and never printed or logged
    - Arguments are passed as-is, no shell expansion
    - When stdin is not a terminal, the first line of stdin is the password

CONFIG:
    $PASSPIPE_CONFIG or ~/.config/passpipe/config.json
    { "prompt": "Enter password: " }"#)]
struct Cli {
    /// Executable to run
    #[arg(value_name = "COMMAND")]
    command: String,

    /// Arguments forwarded to the executable, in order
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() {
    // Logs go to stderr; stdout carries only the child's output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        let _ = report(&e, &mut io::stdout().lock(), &mut io::stderr().lock());

        let code = e
            .downcast_ref::<PasspipeError>()
            .map(PasspipeError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(&Config::path())?;
    let runner = CommandRunner::new(cli.command, cli.args);
    let secret = ask_secret(&mut InteractivePrompt, &config.prompt)?;

    let rt = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let stdout = rt.block_on(run_command(&runner, secret))?;

    let mut out = io::stdout().lock();
    out.write_all(stdout.as_bytes())?;
    out.flush()?;

    Ok(())
}

/// Child failures are relayed on stdout with the child's stderr verbatim,
/// everything else is a passpipe fault on stderr
fn report(e: &anyhow::Error, stdout: &mut impl Write, stderr: &mut impl Write) -> io::Result<()> {
    match e.downcast_ref::<PasspipeError>() {
        Some(PasspipeError::ChildFailure { stderr: text, .. }) => {
            write!(stdout, "Error: {}", text)?;
            stdout.flush()
        }
        _ => writeln!(stderr, "Error: {}", e),
    }
}
