//! Secret - the password read at the prompt
//!
//! The value is held in zeroize-on-drop buffers and never formatted. Wiping is
//! best-effort: copies made by the terminal layer or the kernel pipe are out of
//! reach, and so is std's internal stdin buffer when the secret is read from a
//! non-terminal stdin.

use std::fmt;
use std::io::{self, BufRead, Write};
use tracing::debug;
use zeroize::Zeroizing;

/// Prompt shown when no config overrides it
pub const DEFAULT_PROMPT: &str = "Enter password: ";

/// A password held in memory for a single run
pub struct Secret(Zeroizing<String>);

impl Secret {
    pub fn new(value: String) -> Self {
        Self(Zeroizing::new(value))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// The bytes written to the child: the secret followed by a newline
    pub fn to_line(&self) -> Zeroizing<Vec<u8>> {
        let mut line = Zeroizing::new(Vec::with_capacity(self.0.len() + 1));
        line.extend_from_slice(self.0.as_bytes());
        line.push(b'\n');
        line
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

/// Somewhere a secret can be read from
pub trait SecretSource {
    fn read_secret(&mut self, prompt: &str) -> io::Result<Secret>;
}

/// Reads from the controlling terminal with echo disabled
pub struct TerminalPrompt;

impl SecretSource for TerminalPrompt {
    fn read_secret(&mut self, prompt: &str) -> io::Result<Secret> {
        rpassword::prompt_password(prompt).map(Secret::new)
    }
}

/// Reads one line from a reader, writing the prompt to `writer`.
///
/// Used when stdin is not a terminal, e.g. `printf hunter2 | passpipe ...`.
/// A trailing `\n` or `\r\n` is stripped, a final line without one is
/// accepted. Only completely empty input is an error.
pub struct ReaderPrompt<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> ReaderPrompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl<R: BufRead, W: Write> SecretSource for ReaderPrompt<R, W> {
    fn read_secret(&mut self, prompt: &str) -> io::Result<Secret> {
        self.writer.write_all(prompt.as_bytes())?;
        self.writer.flush()?;

        let mut line = Zeroizing::new(String::new());
        if self.reader.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no password on stdin",
            ));
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }

        Ok(Secret(line))
    }
}

/// The prompt used by the binary: terminal when available, stdin otherwise
pub struct InteractivePrompt;

impl SecretSource for InteractivePrompt {
    fn read_secret(&mut self, prompt: &str) -> io::Result<Secret> {
        prompt_for_secret(prompt)
    }
}

/// Prompt for the secret on the terminal, or read it from stdin when stdin
/// is not a terminal. The prompt never goes to stdout.
pub fn prompt_for_secret(prompt: &str) -> io::Result<Secret> {
    if atty::is(atty::Stream::Stdin) {
        TerminalPrompt.read_secret(prompt)
    } else {
        debug!("stdin is not a terminal, reading password from stdin");
        let stdin = io::stdin();
        ReaderPrompt::new(stdin.lock(), io::stderr()).read_secret(prompt)
    }
}
