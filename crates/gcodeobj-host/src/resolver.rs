//! Job path resolution
//!
//! The host reports job files relative to its uploads folder. Resolution
//! only ever joins below that folder: absolute paths and `..` components
//! are rejected.

use std::path::{Component, Path, PathBuf};

use gcodeobj_settings::HostSettings;

use crate::error::QueryError;

/// Maps a host job path to a file on disk
pub trait PathResolver: Send + Sync {
    /// Resolve `job_path` to an absolute or working-directory-relative path
    fn resolve(&self, job_path: &str) -> Result<PathBuf, QueryError>;
}

/// Resolves job paths below `<base folder>/<uploads dir>`
#[derive(Debug, Clone)]
pub struct UploadsPathResolver {
    uploads: PathBuf,
}

impl UploadsPathResolver {
    /// Resolver rooted at `uploads`
    pub fn new(uploads: impl Into<PathBuf>) -> Self {
        Self {
            uploads: uploads.into(),
        }
    }

    /// Resolver for the configured host layout
    pub fn from_settings(host: &HostSettings) -> Self {
        Self::new(host.uploads_folder())
    }

    /// Root every job path is joined to
    pub fn uploads(&self) -> &Path {
        &self.uploads
    }
}

impl PathResolver for UploadsPathResolver {
    fn resolve(&self, job_path: &str) -> Result<PathBuf, QueryError> {
        let relative = Path::new(job_path);

        if job_path.is_empty() {
            return Err(QueryError::PathRejected {
                path: job_path.to_string(),
                reason: "empty path".to_string(),
            });
        }

        if let Some(bad) = relative
            .components()
            .find(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(QueryError::PathRejected {
                path: job_path.to_string(),
                reason: format!("component {:?} leaves the uploads folder", bad.as_os_str()),
            });
        }

        Ok(self.uploads.join(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joins_below_uploads() {
        let resolver = UploadsPathResolver::new("/home/pi/.octoprint/uploads");
        assert_eq!(
            resolver.resolve("folder/benchy.gcode").unwrap(),
            PathBuf::from("/home/pi/.octoprint/uploads/folder/benchy.gcode")
        );
    }

    #[test]
    fn test_rejects_escapes() {
        let resolver = UploadsPathResolver::new("/uploads");
        assert!(resolver.resolve("../secret.gcode").is_err());
        assert!(resolver.resolve("a/../../b.gcode").is_err());
        assert!(resolver.resolve("/etc/passwd").is_err());
        assert!(resolver.resolve("").is_err());
    }

    #[test]
    fn test_from_settings() {
        let host = HostSettings {
            base_folder: PathBuf::from("/srv/octo"),
            uploads_dir: "uploads".to_string(),
        };
        let resolver = UploadsPathResolver::from_settings(&host);
        assert_eq!(resolver.uploads(), Path::new("/srv/octo/uploads"));
    }
}
