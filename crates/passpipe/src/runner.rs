//! Command runner
//!
//! Launches the child with all three streams piped, feeds it the secret and
//! drains its output at the same time. Feeding first and reading afterwards
//! can deadlock once the child fills a pipe buffer before reading stdin.

use std::io;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::{ChildStdin, Command};
use tracing::{debug, warn};

use crate::error::{PasspipeError, Result};
use crate::secret::{Secret, SecretSource};

/// Result of one child run
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Exit code, `None` if the child was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl Invocation {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Captured stdout on success, `ChildFailure` carrying stderr otherwise
    pub fn into_result(self) -> Result<String> {
        if self.success() {
            Ok(self.stdout)
        } else {
            Err(PasspipeError::ChildFailure {
                code: self.code,
                stderr: self.stderr,
            })
        }
    }
}

/// An executable plus the arguments forwarded to it verbatim
#[derive(Debug, Clone)]
pub struct CommandRunner {
    program: String,
    args: Vec<String>,
}

impl CommandRunner {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Full argument vector as the child sees it: `[program] + args`
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }

    /// Run the child to completion with `secret` as its first input line
    pub async fn run(&self, secret: Secret) -> Result<Invocation> {
        debug!(
            "Launching {} with {} argument(s)",
            self.program,
            self.args.len()
        );

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| PasspipeError::Launch {
                program: self.program.clone(),
                source,
            })?;

        debug!("Child started (pid {:?})", child.id());

        let stdin = child.stdin.take().ok_or_else(|| {
            PasspipeError::ExecutionFault("child stdin was not captured".to_string())
        })?;

        let (fed, output) = tokio::join!(feed_secret(stdin, secret), child.wait_with_output());

        let output = output.map_err(|e| PasspipeError::ExecutionFault(e.to_string()))?;
        fed.map_err(|e| {
            PasspipeError::ExecutionFault(format!("failed to write password to child: {}", e))
        })?;

        let code = output.status.code();
        match code {
            Some(code) => debug!(
                "Child exited with {} ({} bytes stdout, {} bytes stderr)",
                code,
                output.stdout.len(),
                output.stderr.len()
            ),
            None => warn!("Child terminated by signal: {}", output.status),
        }

        Ok(Invocation {
            code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Write `secret\n` and close stdin. A child that exits without reading is fine.
async fn feed_secret(mut stdin: ChildStdin, secret: Secret) -> io::Result<()> {
    let line = secret.to_line();
    drop(secret);

    let written = match stdin.write_all(&line).await {
        Ok(()) => stdin.flush().await,
        Err(e) => Err(e),
    };
    drop(stdin);

    match written {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            debug!("Child closed stdin before reading the password");
            Ok(())
        }
        other => other,
    }
}

/// Ask `source` for the secret. Blocks on the prompt, so call it before
/// entering the runtime.
pub fn ask_secret<S: SecretSource>(source: &mut S, prompt: &str) -> Result<Secret> {
    source.read_secret(prompt).map_err(PasspipeError::Prompt)
}

/// Run the command with `secret` and return its stdout on success
pub async fn run_command(runner: &CommandRunner, secret: Secret) -> Result<String> {
    runner.run(secret).await?.into_result()
}
