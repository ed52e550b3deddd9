//! Mesh conversion
//!
//! `MeshConverter` is the boundary to whatever turns a source mesh into an
//! OBJ file. `StlToObj` handles ASCII and binary STL through `stl_io`, whose
//! indexed mesh already merges shared vertices, so the OBJ output references
//! each vertex once.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::error::{MeshError, MeshResult};

/// Summary of one conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    /// Object name written to the `o` record
    pub name: String,
    /// Distinct vertices written
    pub vertices: usize,
    /// Faces written
    pub faces: usize,
}

/// Converts a mesh file into an OBJ file
pub trait MeshConverter {
    /// Read the mesh at `src` and write OBJ text to `dst`
    fn convert(&self, src: &Path, dst: &Path) -> MeshResult<ConversionReport>;
}

/// STL (ASCII or binary) to OBJ converter
#[derive(Debug, Clone)]
pub struct StlToObj {
    /// Write per-face `vn` records and reference them from faces
    pub with_normals: bool,
}

impl Default for StlToObj {
    fn default() -> Self {
        Self::new()
    }
}

impl StlToObj {
    /// Converter writing faces with normals
    pub fn new() -> Self {
        Self { with_normals: true }
    }

    /// Converter writing bare `f a b c` faces
    pub fn without_normals() -> Self {
        Self {
            with_normals: false,
        }
    }

    fn write_obj<W: Write>(
        &self,
        out: &mut W,
        name: &str,
        mesh: &stl_io::IndexedMesh,
    ) -> std::io::Result<()> {
        writeln!(out, "# Converted from STL")?;
        writeln!(out, "# Vertices: {}", mesh.vertices.len())?;
        writeln!(out, "# Faces: {}", mesh.faces.len())?;
        writeln!(out, "o {}", name)?;

        for v in &mesh.vertices {
            writeln!(out, "v {} {} {}", v[0], v[1], v[2])?;
        }

        if self.with_normals {
            for face in &mesh.faces {
                let n = face.normal;
                writeln!(out, "vn {} {} {}", n[0], n[1], n[2])?;
            }
        }

        // OBJ indices are 1-based
        for (i, face) in mesh.faces.iter().enumerate() {
            let [a, b, c] = face.vertices;
            if self.with_normals {
                let n = i + 1;
                writeln!(out, "f {}//{} {}//{} {}//{}", a + 1, n, b + 1, n, c + 1, n)?;
            } else {
                writeln!(out, "f {} {} {}", a + 1, b + 1, c + 1)?;
            }
        }

        out.flush()
    }
}

impl MeshConverter for StlToObj {
    fn convert(&self, src: &Path, dst: &Path) -> MeshResult<ConversionReport> {
        let file = File::open(src).map_err(|e| MeshError::file_access(src, e))?;
        let mut reader = BufReader::new(file);
        let mesh = stl_io::read_stl(&mut reader).map_err(|e| MeshError::InvalidStl {
            path: src.to_path_buf(),
            source: e,
        })?;

        if mesh.faces.is_empty() {
            return Err(MeshError::EmptyMesh {
                path: src.to_path_buf(),
            });
        }

        let name = src
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("mesh")
            .replace(char::is_whitespace, "_");

        debug!(
            "Read {} vertices and {} faces from {}",
            mesh.vertices.len(),
            mesh.faces.len(),
            src.display()
        );

        let out = File::create(dst).map_err(|e| MeshError::file_access(dst, e))?;
        let mut writer = BufWriter::new(out);
        self.write_obj(&mut writer, &name, &mesh)
            .map_err(|e| MeshError::file_access(dst, e))?;

        info!("Converted {} to {}", src.display(), dst.display());

        Ok(ConversionReport {
            name,
            vertices: mesh.vertices.len(),
            faces: mesh.faces.len(),
        })
    }
}
