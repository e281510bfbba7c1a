//! Source formatting step, run on rendered text before placeholders are
//! resolved. Contains [Formatter] trait with [Passthrough] and
//! [CommandFormatter] implementations.

use crate::error::Error;
use itertools::Itertools;
use std::{
    ffi::OsString,
    io::{self, Write},
    process::{Command, Stdio},
};
use tempfile::NamedTempFile;

/// Formats generated source text.
///
/// Placeholders present in text must be kept intact. Since they are always
/// located inside string literals, any real source formatter does so.
pub trait Formatter {
    /// Returns formatted `source`.
    fn format(
        &self,
        source: String,
    ) -> Result<String, Error>;
}

/// [Formatter] returning source unchanged.
#[derive(Debug, Default)]
pub struct Passthrough;
impl Formatter for Passthrough {
    fn format(
        &self,
        source: String,
    ) -> Result<String, Error> {
        Ok(source)
    }
}

/// [Formatter] running external program, eg. `gofmt`.
///
/// Source is written to a temporary file, whose path is passed to the program
/// as the last argument. Program is expected to print formatted source to
/// stdout and exit successfully. Anything else is reported as
/// [Error::Format], including stderr output.
#[derive(Debug)]
pub struct CommandFormatter {
    program: OsString,
    args: Vec<OsString>,
}
impl CommandFormatter {
    /// Creates formatter running `program` with `args`.
    pub fn new(
        program: impl Into<OsString>,
        args: impl IntoIterator<Item = impl Into<OsString>>,
    ) -> Self {
        let program = program.into();
        let args = args.into_iter().map(Into::into).collect();

        Self { program, args }
    }

    fn run_error(
        &self,
        error: io::Error,
    ) -> Error {
        Error::Format {
            message: format!("unable to run {}", self.program.to_string_lossy()),
            source: Some(error),
        }
    }
}
impl Formatter for CommandFormatter {
    fn format(
        &self,
        source: String,
    ) -> Result<String, Error> {
        let mut file = NamedTempFile::new().map_err(|error| self.run_error(error))?;
        file.write_all(source.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|error| self.run_error(error))?;
        drop(source);

        log::debug!(
            "formatting generated source with {} {}",
            self.program.to_string_lossy(),
            self.args.iter().map(|arg| arg.to_string_lossy()).join(" ")
        );

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(file.path())
            .stdin(Stdio::null())
            .output()
            .map_err(|error| self.run_error(error))?;

        if !output.status.success() {
            return Err(Error::Format {
                message: format!(
                    "{} failed ({}): {}",
                    self.program.to_string_lossy(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
                source: None,
            });
        }

        String::from_utf8(output.stdout).map_err(|_| Error::Format {
            message: format!(
                "{} produced output that is not valid utf-8",
                self.program.to_string_lossy()
            ),
            source: None,
        })
    }
}
