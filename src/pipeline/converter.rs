//! The external markdown-to-HTML converter.
//!
//! The converter is a black box: it gets an argument vector, blocks until
//! it exits, and hands back whatever it wrote plus its exit status. The
//! [`Converter`] trait is the seam tests use to substitute a fake.

use crate::config::RenderConfig;
use crate::error::RenderError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;
use tracing::{debug, warn};

/// Everything a finished converter run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// Exit code, `None` when the process was killed by a signal.
    pub status: Option<i32>,
    pub success: bool,
}

impl ConverterOutput {
    /// Turn a failed run into [`RenderError::ConverterFailed`]; a successful
    /// run yields its stdout.
    pub fn into_stdout(self) -> Result<Vec<u8>, RenderError> {
        if self.success {
            Ok(self.stdout)
        } else {
            Err(RenderError::ConverterFailed {
                status: self.status,
                stderr: self.stderr,
            })
        }
    }
}

/// Runs the converter with a given argument vector.
pub trait Converter {
    fn run(&self, args: &[String]) -> Result<ConverterOutput, RenderError>;
}

/// Converter backed by an executable on disk.
#[derive(Debug, Clone)]
pub struct CommandConverter {
    program: PathBuf,
}

impl CommandConverter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Converter for CommandConverter {
    fn run(&self, args: &[String]) -> Result<ConverterOutput, RenderError> {
        let started_at = Instant::now();
        debug!("Running converter {} {:?}", self.program.display(), args);

        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| {
                if source.kind() == ErrorKind::NotFound {
                    warn!("Converter not found: {}", self.program.display());
                }
                RenderError::ConverterSpawn {
                    program: self.program.clone(),
                    source,
                }
            })?;

        debug!(
            "Converter finished in {}ms (status {:?}, {} bytes out, {} bytes err)",
            started_at.elapsed().as_millis(),
            output.status.code(),
            output.stdout.len(),
            output.stderr.len()
        );

        Ok(ConverterOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            status: output.status.code(),
            success: output.status.success(),
        })
    }
}

/// Build the converter argument vector for `document`.
///
/// The document path is always the last argument; an absent path is passed
/// as an empty string.
pub fn converter_args(document: Option<&str>, config: &RenderConfig) -> Vec<String> {
    let mut args = Vec::with_capacity(4);
    if config.unsafe_html {
        args.push("--unsafe".to_string());
    }
    args.push("--syntax-highlighting".to_string());
    args.push(config.theme.clone());
    args.push(document.unwrap_or_default().to_string());
    args
}
