//! Error handling for the embed/extract codec
//!
//! Separates the three failure classes callers need to tell apart:
//! - a scan that found no tagged lines (payload absent)
//! - filesystem failures on a known path (file access)
//! - a marker configuration that cannot be used
//!
//! All error types use `thiserror` for ergonomic error handling.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Codec error type
#[derive(Error, Debug)]
pub enum CodecError {
    /// The scan completed but no line carried the marker
    #[error("No obj available")]
    PayloadAbsent,

    /// Reading, writing or deleting a file failed
    #[error("Failed to access {}: {source}", path.display())]
    FileAccess {
        /// The file that could not be accessed.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The derived output path would overwrite the source document
    #[error("Derived path {} is the source file itself", path.display())]
    DerivedPathConflict {
        /// The conflicting path.
        path: PathBuf,
    },

    /// Marker token or derived extension is unusable
    #[error("Invalid marker configuration: {reason}")]
    InvalidMarker {
        /// Why the configuration was rejected.
        reason: String,
    },

    /// I/O error on a stream with no associated path
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CodecError {
    /// Wrap an I/O error with the path it happened on
    pub fn file_access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CodecError::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// Check if this is the "no payload" outcome
    pub fn is_payload_absent(&self) -> bool {
        matches!(self, CodecError::PayloadAbsent)
    }

    /// Check if this is a filesystem failure
    pub fn is_file_access(&self) -> bool {
        matches!(self, CodecError::FileAccess { .. } | CodecError::Io(_))
    }
}

/// Result type using CodecError
pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_absent_message() {
        assert_eq!(CodecError::PayloadAbsent.to_string(), "No obj available");
        assert!(CodecError::PayloadAbsent.is_payload_absent());
        assert!(!CodecError::PayloadAbsent.is_file_access());
    }

    #[test]
    fn test_file_access_carries_path() {
        let err = CodecError::file_access(
            "/tmp/print.gcode",
            io::Error::new(io::ErrorKind::NotFound, "missing"),
        );
        assert_eq!(err.to_string(), "Failed to access /tmp/print.gcode: missing");
        assert!(err.is_file_access());
    }

    #[test]
    fn test_io_conversion() {
        let err: CodecError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(err, CodecError::Io(_)));
        assert!(err.is_file_access());
    }
}
