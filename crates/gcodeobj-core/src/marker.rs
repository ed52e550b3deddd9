//! Marker convention
//!
//! A gcode line belongs to the embedded OBJ payload iff it starts with the
//! marker token. The token is matched as a plain, case-sensitive prefix with
//! no whitespace tolerance, so `;objection` is a tagged line carrying
//! `ection`.

use crate::error::{CodecError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Marker token used to tag embedded OBJ lines
pub const DEFAULT_MARKER: &str = ";obj";

/// Extension of the sibling file written by the derived-file extraction
pub const DEFAULT_DERIVED_EXTENSION: &str = "obj";

/// Marker token and derived-extension rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Prefix identifying an embedded mesh line
    pub token: String,
    /// Extension (without dot) of the derived output file
    pub derived_extension: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            token: DEFAULT_MARKER.to_string(),
            derived_extension: DEFAULT_DERIVED_EXTENSION.to_string(),
        }
    }
}

impl MarkerConfig {
    /// Create a marker config with a custom token and the default extension
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.token.is_empty() {
            return Err(CodecError::InvalidMarker {
                reason: "marker token must not be empty".to_string(),
            });
        }

        if self.token.contains(['\n', '\r']) {
            return Err(CodecError::InvalidMarker {
                reason: "marker token must fit on a single line".to_string(),
            });
        }

        let ext = self.extension();
        if ext.is_empty() {
            return Err(CodecError::InvalidMarker {
                reason: "derived extension must not be empty".to_string(),
            });
        }

        if ext.contains(['/', '\\']) {
            return Err(CodecError::InvalidMarker {
                reason: format!("derived extension '{}' contains a path separator", ext),
            });
        }

        Ok(())
    }

    /// Whether `line` carries the marker
    pub fn is_tagged(&self, line: &str) -> bool {
        line.starts_with(&self.token)
    }

    /// Remove the marker from a tagged line, `None` for untagged lines
    pub fn strip<'a>(&self, line: &'a str) -> Option<&'a str> {
        line.strip_prefix(self.token.as_str())
    }

    /// Derived extension with any leading dot removed
    pub fn extension(&self) -> &str {
        self.derived_extension.trim_start_matches('.')
    }

    /// Sibling path with the final extension replaced by the derived extension
    ///
    /// `print.gcode` becomes `print.obj`; a path without an extension gets
    /// one appended.
    pub fn derived_path(&self, source: impl AsRef<Path>) -> PathBuf {
        source.as_ref().with_extension(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_marker() {
        let marker = MarkerConfig::default();
        assert_eq!(marker.token, ";obj");
        assert_eq!(marker.extension(), "obj");
        assert!(marker.validate().is_ok());
    }

    #[test]
    fn test_prefix_is_exact() {
        let marker = MarkerConfig::default();
        assert!(marker.is_tagged(";obj v 1 2 3"));
        assert!(!marker.is_tagged(" ;obj v 1 2 3"));
        assert!(!marker.is_tagged(";OBJ v 1 2 3"));
        assert_eq!(marker.strip(";objection noted"), Some("ection noted"));
        assert_eq!(marker.strip("G1 X1 ;obj"), None);
    }

    #[test]
    fn test_strip_removes_only_one_marker() {
        let marker = MarkerConfig::default();
        assert_eq!(marker.strip(";obj;obj v 1\n"), Some(";obj v 1\n"));
    }

    #[test]
    fn test_derived_path() {
        let marker = MarkerConfig::default();
        assert_eq!(
            marker.derived_path("uploads/print.gcode"),
            PathBuf::from("uploads/print.obj")
        );
        assert_eq!(
            marker.derived_path("part.v2.gcode"),
            PathBuf::from("part.v2.obj")
        );
        assert_eq!(marker.derived_path("noext"), PathBuf::from("noext.obj"));
    }

    #[test]
    fn test_leading_dot_in_extension() {
        let marker = MarkerConfig {
            derived_extension: ".mesh".to_string(),
            ..MarkerConfig::default()
        };
        assert_eq!(marker.derived_path("a.gcode"), PathBuf::from("a.mesh"));
    }

    #[test]
    fn test_validate_rejects_bad_config() {
        assert!(MarkerConfig::with_token("").validate().is_err());
        assert!(MarkerConfig::with_token(";o\nbj").validate().is_err());

        let marker = MarkerConfig {
            derived_extension: "../obj".to_string(),
            ..MarkerConfig::default()
        };
        assert!(marker.validate().is_err());

        let marker = MarkerConfig {
            derived_extension: ".".to_string(),
            ..MarkerConfig::default()
        };
        assert!(marker.validate().is_err());
    }
}
