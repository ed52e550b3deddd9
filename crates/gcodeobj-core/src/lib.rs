//! # gcodeobj Core
//!
//! Embeds Wavefront OBJ text in gcode files as marker-tagged comment lines
//! and extracts it again.
//!
//! ```text
//! G1 X10 Y10
//! ;objv 0 0 0      <- tagged line, payload "v 0 0 0"
//! ;objf 1 2 3
//! ```
//!
//! - **MarkerConfig**: marker token (`;obj`) and the derived-extension rule
//! - **ObjCodec**: in-memory and streaming encode/decode, plus file-level
//!   embed and extract (in memory or to the derived `.obj` sibling)
//! - **CodecError**: payload-absent, file-access and configuration failures

pub mod codec;
pub mod error;
pub mod file_io;
pub mod marker;

pub use codec::{Extraction, ObjCodec};
pub use error::{CodecError, Result};
pub use file_io::{DerivedObj, ExtractMode};
pub use marker::{MarkerConfig, DEFAULT_DERIVED_EXTENSION, DEFAULT_MARKER};
