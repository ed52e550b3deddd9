//! Error types for the mesh crate.

use gcodeobj_core::CodecError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while converting or reading meshes.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh file could not be opened, read or written.
    #[error("Failed to access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The STL data could not be decoded.
    #[error("Invalid STL {}: {source}", path.display())]
    InvalidStl {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The STL file contains no triangles.
    #[error("STL {} contains no triangles", path.display())]
    EmptyMesh { path: PathBuf },

    /// An OBJ record could not be parsed.
    #[error("OBJ line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// Embedding or extracting the converted mesh failed.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl MeshError {
    pub(crate) fn file_access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        MeshError::FileAccess {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;
