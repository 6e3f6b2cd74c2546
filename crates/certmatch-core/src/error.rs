//! Error types for certmatch

use std::path::{Path, PathBuf};
use time::OffsetDateTime;

/// Result type alias using [`Error`]
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Main error type for certmatch
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A directory could not be listed
    #[error("Failed to list directory {}: {source}", path.display())]
    ListDir {
        /// Directory or entry that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The output file could not be written
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File carries neither a certificate nor a private key header
    #[error("Not a certificate or private key: {}", .0.display())]
    InvalidFile(PathBuf),

    /// Malformed PEM, certificate, or key
    #[error("Failed to parse {}: {message}", path.display())]
    Parse {
        /// Path that failed
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// Certificate validity has ended
    #[error("Certificate expired at {not_after}: {}", path.display())]
    Expired {
        /// Certificate path
        path: PathBuf,
        /// End of validity
        not_after: OffsetDateTime,
    },

    /// No private key shares the certificate's public key
    #[error("No matching private key for {}", .0.display())]
    NoMatchFound(PathBuf),

    /// A per-file task exceeded the configured timeout
    #[error("Timed out processing {}", .0.display())]
    Timeout(PathBuf),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A spawned task panicked or was cancelled
    #[error("Task failed: {0}")]
    Task(String),

    /// Rendering the output configuration failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create a directory listing error
    pub fn list_dir(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Error::ListDir {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a file read error
    pub fn read(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Error::Read {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create an output write error
    pub fn write(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Error::Write {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a parse error tagged with its path
    pub fn parse(path: impl AsRef<Path>, message: impl ToString) -> Self {
        Error::Parse {
            path: path.as_ref().to_path_buf(),
            message: message.to_string(),
        }
    }

    /// Path of the file the error concerns, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Error::ListDir { path, .. }
            | Error::Read { path, .. }
            | Error::Write { path, .. }
            | Error::Parse { path, .. }
            | Error::Expired { path, .. } => Some(path),
            Error::InvalidFile(path) | Error::NoMatchFound(path) | Error::Timeout(path) => {
                Some(path)
            }
            Error::Config(_) | Error::Task(_) | Error::Serialization(_) => None,
        }
    }

    /// Whether the error stays isolated to one file.
    ///
    /// Per-file failures, including an unreadable file, never abort a scan.
    /// Directory listing, settings and output failures do.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Read { .. }
                | Error::InvalidFile(_)
                | Error::Parse { .. }
                | Error::Expired { .. }
                | Error::NoMatchFound(_)
                | Error::Timeout(_)
                | Error::Task(_)
        )
    }

    /// Short stable label for events and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Error::ListDir { .. } => "list_dir",
            Error::Read { .. } => "read",
            Error::Write { .. } => "write",
            Error::InvalidFile(_) => "invalid_file",
            Error::Parse { .. } => "parse",
            Error::Expired { .. } => "expired",
            Error::NoMatchFound(_) => "no_match",
            Error::Timeout(_) => "timeout",
            Error::Config(_) => "config",
            Error::Task(_) => "task",
            Error::Serialization(_) => "serialization",
        }
    }
}
