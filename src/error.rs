#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a grading run.
///
/// Nothing is recovered locally. Each variant names its kind in the rendered
/// message so an operator can tell a bad argument from a bad file from a bad
/// response.
#[derive(Debug, Error)]
pub enum DocCheckError {
    /// The root directory is missing, does not exist, or is not a directory.
    #[error("Input error: {0}")]
    Input(String),
    /// The rubric file given on the command line could not be read.
    #[error("Input error: could not read rubric file `{path}`: {source}")]
    Rubric {
        /// Path of the rubric file.
        path:   PathBuf,
        /// Underlying read failure.
        #[source]
        source: std::io::Error,
    },
    /// A file under the root could not be listed or read.
    #[error("I/O error: could not read `{path}`: {source}")]
    Read {
        /// Path of the entry that failed.
        path:   PathBuf,
        /// Underlying read failure.
        #[source]
        source: std::io::Error,
    },
    /// An evaluation could not be written to the output stream.
    #[error("I/O error: could not write evaluation to output: {0}")]
    Output(#[source] std::io::Error),
    /// The language model service rejected or failed a request.
    #[error("External service error: {0}")]
    Service(String),
    /// Credentials or endpoint settings are missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification used when reporting a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad arguments, reported before traversal.
    Input,
    /// Filesystem or output stream failure.
    Io,
    /// Failure from the language model service.
    Service,
    /// Missing configuration.
    Config,
}

impl DocCheckError {
    /// Returns the kind of failure this error represents.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Input(_) | Self::Rubric { .. } => ErrorKind::Input,
            Self::Read { .. } | Self::Output(_) => ErrorKind::Io,
            Self::Service(_) => ErrorKind::Service,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}
