//! Convert a mesh and inject it into a gcode file
//!
//! The intermediate OBJ file lives in a temporary file that is removed on
//! every exit path, including conversion and embed failures.

use std::path::Path;

use gcodeobj_core::ObjCodec;
use tracing::info;

use crate::convert::{ConversionReport, MeshConverter};
use crate::error::{MeshError, MeshResult};

/// Result of an injection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectReport {
    /// What the converter produced
    pub conversion: ConversionReport,
    /// Tagged lines appended to the gcode file
    pub lines_embedded: usize,
}

/// Convert `mesh_path` with `converter` and append the OBJ to `gcode_path`
pub fn inject_mesh<C>(
    converter: &C,
    codec: &ObjCodec,
    mesh_path: &Path,
    gcode_path: &Path,
) -> MeshResult<InjectReport>
where
    C: MeshConverter + ?Sized,
{
    let intermediate = tempfile::Builder::new()
        .prefix("gcodeobj-")
        .suffix(".obj")
        .tempfile()
        .map_err(|e| MeshError::file_access(std::env::temp_dir(), e))?;

    let conversion = converter.convert(mesh_path, intermediate.path())?;
    let lines_embedded = codec.embed_file(intermediate.path(), gcode_path)?;

    let tmp_path = intermediate.path().to_path_buf();
    intermediate
        .close()
        .map_err(|e| MeshError::file_access(tmp_path, e))?;

    info!(
        "Injected {} ({} faces) into {}",
        mesh_path.display(),
        conversion.faces,
        gcode_path.display()
    );

    Ok(InjectReport {
        conversion,
        lines_embedded,
    })
}
