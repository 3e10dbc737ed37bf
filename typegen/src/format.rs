//! Formatting pass over generated Python source.
//!
//! Generated text is handed to an external formatter before it is written.
//! The formatter doubles as a syntax check: it rejects input that does not
//! parse, and a rejection aborts the whole run.

use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;

use thiserror::Error;
use tracing::debug;

use crate::config::FormatterKind;

/// Errors reported by a formatter.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The formatter program could not be started.
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The formatter ran and refused the input.
    #[error("'{program}' exited with {status}: {stderr}")]
    Rejected {
        program: String,
        status: String,
        stderr: String,
    },

    /// The formatter produced output that is not UTF-8.
    #[error("'{program}' produced non UTF-8 output")]
    InvalidOutput { program: String },
}

/// Something that canonicalizes source text.
pub trait SourceFormatter {
    /// Returns `source` reformatted to fit within `line_width` columns.
    fn format(&self, source: &str, line_width: usize) -> Result<String, FormatError>;
}

/// Runs a formatter program that reads source on stdin and writes it on stdout.
#[derive(Debug, Clone)]
pub struct ExternalFormatter {
    program: String,
    args: Vec<String>,
}

impl ExternalFormatter {
    /// `black --quiet --line-length N -`
    pub fn black() -> Self {
        Self {
            program: "black".to_string(),
            args: vec!["--quiet".to_string()],
        }
    }

    /// `ruff format --quiet --line-length N -`
    pub fn ruff() -> Self {
        Self {
            program: "ruff".to_string(),
            args: vec!["format".to_string(), "--quiet".to_string()],
        }
    }

    /// A custom program. `--line-length N -` is appended to `args`.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl SourceFormatter for ExternalFormatter {
    fn format(&self, source: &str, line_width: usize) -> Result<String, FormatError> {
        let spawn_error = |source| FormatError::Spawn {
            program: self.program.clone(),
            source,
        };

        debug!(program = %self.program, bytes = source.len(), "Running formatter");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg("--line-length")
            .arg(line_width.to_string())
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        // stdin is fed from its own thread while stdout and stderr drain here,
        // so neither side can stall on a full pipe. Dropping stdin sends EOF.
        // A formatter that exits before reading everything is judged by its
        // exit status.
        let stdin = child.stdin.take();
        let (written, output) = thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => match stdin.write_all(source.as_bytes()) {
                    Err(e) if e.kind() != io::ErrorKind::BrokenPipe => Err(e),
                    _ => Ok(()),
                },
                None => Ok(()),
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (written, output)
        });
        let output = output.map_err(spawn_error)?;
        written.map_err(spawn_error)?;
        if !output.status.success() {
            return Err(FormatError::Rejected {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| FormatError::InvalidOutput {
            program: self.program.clone(),
        })
    }
}

/// Returns the input unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl SourceFormatter for Passthrough {
    fn format(&self, source: &str, _line_width: usize) -> Result<String, FormatError> {
        Ok(source.to_string())
    }
}

/// Builds the formatter selected by configuration.
pub fn formatter_for(kind: FormatterKind) -> Box<dyn SourceFormatter> {
    match kind {
        FormatterKind::Black => Box::new(ExternalFormatter::black()),
        FormatterKind::Ruff => Box::new(ExternalFormatter::ruff()),
        FormatterKind::None => Box::new(Passthrough),
    }
}
