//! Error types for the host query
//!
//! `message()` yields the text placed in the `Error` field of the JSON
//! error payload; the two host-facing outcomes keep their literal messages.

use gcodeobj_core::CodecError;
use thiserror::Error;

use crate::job::JobState;

/// Failure of an OBJ query against the current job
#[derive(Error, Debug)]
pub enum QueryError {
    /// The host is not actively printing
    #[error("Not printing")]
    NotPrinting {
        /// State the host reported instead
        state: JobState,
    },

    /// The host is printing but reports no job file
    #[error("No job file selected")]
    NoJobFile,

    /// The job path would resolve outside the uploads folder
    #[error("Rejected job path '{path}': {reason}")]
    PathRejected {
        /// Job path as reported by the host
        path: String,
        /// Why it was rejected
        reason: String,
    },

    /// Extraction failed (no payload, or file access)
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl QueryError {
    /// Text for the `Error` field of the response payload
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if the host gate rejected the query
    pub fn is_not_printing(&self) -> bool {
        matches!(self, QueryError::NotPrinting { .. })
    }

    /// Check if the file had no embedded mesh
    pub fn is_payload_absent(&self) -> bool {
        matches!(self, QueryError::Codec(e) if e.is_payload_absent())
    }
}
