//! # gcodeobj Mesh
//!
//! Mesh-side helpers around the embed/extract codec:
//! - **MeshConverter** / **StlToObj**: turn an STL file into OBJ text
//! - **inject_mesh**: convert and append the result to a gcode file
//! - **ObjMesh**: read back vertices and triangles for inspection

pub mod convert;
pub mod error;
pub mod inject;
pub mod obj;

pub use convert::{ConversionReport, MeshConverter, StlToObj};
pub use error::{MeshError, MeshResult};
pub use inject::{inject_mesh, InjectReport};
pub use obj::ObjMesh;
