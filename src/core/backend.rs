//! Media inspection backend interface for mediascope.
//!
//! The session never talks to a media parser directly. Everything goes through a
//! [MediaBackend], which lives on the worker thread (see [crate::core::worker]) and answers
//! one request at a time. Every operation is fallible and reports a [BackendError].

use crate::config::General;
use crate::core::stream::{About, Parameter, PropertyRequest, StreamCounts, StreamProperties};

use thiserror::Error;

use std::io;
use std::path::{Path, PathBuf};

/// Errors raised by a backend operation.
///
/// They never escape the session: each one ends up as a single notification.
#[derive(Error, Debug)]
pub enum BackendError {
    /// A filesystem or pipe error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The inspection program is missing or exited unsuccessfully
    #[error("Process error: {0}")]
    Process(String),

    /// Output or config text could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// The operation is not available for this input
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl From<toml::de::Error> for BackendError {
    fn from(e: toml::de::Error) -> Self {
        BackendError::Parse(e.to_string())
    }
}

impl From<toml::ser::Error> for BackendError {
    fn from(e: toml::ser::Error) -> Self {
        BackendError::Parse(e.to_string())
    }
}

/// Request/response interface of the media inspection backend.
pub trait MediaBackend: Send {
    /// Application and backend versions.
    fn about(&self) -> Result<About, BackendError>;

    /// The persisted configuration record.
    fn config(&self) -> Result<General, BackendError>;

    /// Stores a new configuration record and returns its normalized form.
    fn set_config(&mut self, config: General) -> Result<General, BackendError>;

    /// Resolves files and directories into a flat list of media files.
    fn files(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>, BackendError>;

    /// Catalog of every (stream, property) pair the backend knows.
    fn parameters(&self) -> Result<Vec<Parameter>, BackendError>;

    fn stream_counts(&self, file: &Path) -> Result<StreamCounts, BackendError>;

    /// Properties of every stream instance of a file.
    ///
    /// `None` requests every property, `Some` only the listed ones.
    fn properties(
        &self,
        file: &Path,
        requests: Option<&[PropertyRequest]>,
    ) -> Result<Vec<StreamProperties>, BackendError>;

    fn write_text_file(&self, path: &Path, text: &str) -> Result<(), BackendError>;
}
