//! Minimal OBJ reader
//!
//! Reads just enough of a Wavefront OBJ document to describe it: object
//! name, vertex positions and triangles. Faces with more than three corners
//! are fan-triangulated, `/`-separated texture and normal references are
//! ignored, and negative indices count back from the last vertex read.

use crate::error::{MeshError, MeshResult};

/// Parsed mesh geometry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjMesh {
    /// Name from the last `o` record
    pub name: Option<String>,
    /// Vertex positions
    pub vertices: Vec<[f32; 3]>,
    /// Triangle corner indices into `vertices` (0-based, 3 per triangle)
    pub triangles: Vec<usize>,
}

impl ObjMesh {
    /// Parse OBJ text
    ///
    /// # Errors
    /// Returns `MeshError::Parse` with the 1-based line number for malformed
    /// `v` or `f` records.
    pub fn parse(text: &str) -> MeshResult<Self> {
        let mut mesh = ObjMesh::default();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            match tokens.next() {
                Some("o") => {
                    mesh.name = tokens.next().map(str::to_string);
                }
                Some("v") => {
                    let mut position = [0f32; 3];
                    for axis in position.iter_mut() {
                        let token = tokens.next().ok_or_else(|| MeshError::Parse {
                            line: line_no,
                            reason: "vertex needs three coordinates".to_string(),
                        })?;
                        *axis = token.parse().map_err(|_| MeshError::Parse {
                            line: line_no,
                            reason: format!("invalid vertex coordinate '{}'", token),
                        })?;
                    }
                    mesh.vertices.push(position);
                }
                Some("f") => {
                    let corners = tokens
                        .map(|t| mesh.resolve_index(t, line_no))
                        .collect::<MeshResult<Vec<_>>>()?;
                    if corners.len() < 3 {
                        return Err(MeshError::Parse {
                            line: line_no,
                            reason: format!("face has {} corners, needs at least 3", corners.len()),
                        });
                    }
                    for pair in corners[1..].windows(2) {
                        mesh.triangles.extend_from_slice(&[corners[0], pair[0], pair[1]]);
                    }
                }
                _ => {}
            }
        }

        Ok(mesh)
    }

    fn resolve_index(&self, token: &str, line: usize) -> MeshResult<usize> {
        let head = token.split('/').next().unwrap_or_default();
        let raw: i64 = head.parse().map_err(|_| MeshError::Parse {
            line,
            reason: format!("invalid face index '{}'", token),
        })?;

        let count = self.vertices.len() as i64;
        let resolved = match raw {
            0 => None,
            n if n > 0 => Some(n - 1),
            n => Some(count + n),
        };

        match resolved {
            Some(i) if (0..count).contains(&i) => Ok(i as usize),
            _ => Err(MeshError::Parse {
                line,
                reason: format!("face index {} out of range ({} vertices)", raw, count),
            }),
        }
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Axis-aligned bounding box as `(min, max)`, `None` without vertices
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(mut min, mut max), v| {
            for axis in 0..3 {
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
            (min, max)
        }))
    }

    /// Factor that scales the largest extent of the mesh to `size`
    ///
    /// Degenerate meshes (no vertices, zero extent) return 1.0.
    pub fn scale_factor(&self, size: f32) -> f32 {
        self.fit(size).0
    }

    /// Scale factor for `size` plus the Y offset that puts the scaled mesh
    /// on the ground plane (`-min.y * factor`)
    pub fn fit(&self, size: f32) -> (f32, f32) {
        let Some((min, max)) = self.bounds() else {
            return (1.0, 0.0);
        };
        let extent = (0..3).map(|a| max[a] - min[a]).fold(0f32, f32::max);
        let factor = if extent > 0.0 { size / extent } else { 1.0 };
        (factor, -min[1] * factor)
    }
}
