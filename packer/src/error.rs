//! Error type of the packer library. Every error is fatal to the generation
//! run and carries box name and / or path needed to diagnose it.

use std::{io, path::PathBuf};
use thiserror::Error;

/// Error of any generation stage.
#[derive(Error, Debug)]
pub enum Error {
    /// Box root can not be inspected (missing, permission denied, ...).
    #[error("unable to access box {name:?} at {}", path.display())]
    Discovery {
        /// Box name.
        name: String,
        /// Requested root path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Box root is not a directory.
    #[error("box {name:?} must point to a directory, but {} is not one", path.display())]
    NotADirectory {
        /// Box name.
        name: String,
        /// Resolved root path.
        path: PathBuf,
    },
    /// Directory traversal failed partway.
    #[error("error walking box {name:?}")]
    Walk {
        /// Box name.
        name: String,
        /// Underlying error, containing offending path.
        #[source]
        source: walkdir::Error,
    },
    /// Reading metadata of walked entry failed, eg. for a dangling link.
    #[error("error reading metadata of {}", path.display())]
    Metadata {
        /// Walked entry.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Path can not be represented as utf-8.
    #[error("path {} is not valid utf-8", path.display())]
    NonUtf8Path {
        /// Offending path.
        path: PathBuf,
    },
    /// File found, but its parent directory was not registered.
    #[error("parent of file {} is not within the box", path.display())]
    OrphanFile {
        /// Offending file path.
        path: PathBuf,
    },
    /// Directory found, but its parent directory was not registered.
    #[error("parent of directory {} is not within the box", path.display())]
    MissingParent {
        /// Offending directory path.
        path: PathBuf,
    },
    /// Directory was added twice.
    #[error("directory {} visited twice", path.display())]
    DuplicatePath {
        /// Offending directory path.
        path: PathBuf,
    },
    /// Package name is not a valid identifier.
    #[error("invalid package name {name:?}")]
    InvalidPackageName {
        /// Offending name.
        name: String,
    },
    /// Template failed to parse or render.
    #[error("error rendering template")]
    Template(#[from] tera::Error),
    /// Template text contains placeholder delimiter.
    #[error("template contains reserved sequence {sequence:?}")]
    TemplateReservedSequence {
        /// The reserved sequence found.
        sequence: &'static str,
    },
    /// Placeholder in rendered text could not be decoded.
    #[error("malformed placeholder {token:?}: {reason}")]
    MalformedPlaceholder {
        /// Placeholder contents (lossy).
        token: String,
        /// What is wrong with it.
        reason: String,
    },
    /// Opening or reading referenced file during resolve pass failed.
    #[error("error reading content of {}", path.display())]
    EncodeIo {
        /// File being embedded.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// External formatting step rejected generated source.
    #[error("error formatting generated source: {message}")]
    Format {
        /// Formatter diagnostics.
        message: String,
        /// Underlying error, if the formatter could not be run at all.
        #[source]
        source: Option<io::Error>,
    },
    /// Writing to destination failed.
    #[error("error writing generated source")]
    Output(#[source] io::Error),
}
