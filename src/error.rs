//! Error type shared by the compiler and the draft/note commands

use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors reported by zett-note operations
#[derive(Debug, Error)]
pub enum Error {
    /// A file the operation depends on does not exist
    #[error("{what} not found: {}", path.display())]
    NotFound { what: &'static str, path: PathBuf },

    /// File content could not be interpreted (e.g. a note that is not UTF-8)
    #[error("malformed {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    /// Read, write, append or move failure
    #[error("I/O failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Per-item failures collected by a batch operation
    #[error("{}", format_aggregate(*total, failures))]
    Aggregate {
        total: usize,
        failures: Vec<(PathBuf, Error)>,
    },

    /// Rejected user input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The external editor could not be run
    #[error("editor failed: {0}")]
    Editor(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Classify an I/O error raised while touching `path`
    pub fn from_io(what: &'static str, path: impl AsRef<Path>, source: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => Error::NotFound { what, path },
            io::ErrorKind::InvalidData => Error::Malformed {
                path,
                reason: source.to_string(),
            },
            _ => Error::Io { path, source },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

fn format_aggregate(total: usize, failures: &[(PathBuf, Error)]) -> String {
    let mut out = format!("{} of {} notes failed to compile", failures.len(), total);
    for (path, err) in failures {
        let _ = write!(out, "\n  {}: {}", path.display(), err);
    }
    out
}
