//! # gcodeobj
//!
//! Carries a Wavefront OBJ mesh inside a gcode file and hands it back out
//! while the file is printing.
//!
//! ## Architecture
//!
//! gcodeobj is organized as a workspace with multiple crates:
//!
//! 1. **gcodeobj-core** - marker convention, embed/extract codec, derived paths
//! 2. **gcodeobj-mesh** - STL to OBJ conversion, injection, OBJ inspection
//! 3. **gcodeobj-settings** - configuration files and validation
//! 4. **gcodeobj-host** - print-state gate, upload path resolution, HTTP endpoint
//! 5. **gcodeobj** - CLI binary that integrates all crates

pub mod commands;

pub use gcodeobj_core::{CodecError, DerivedObj, ExtractMode, Extraction, MarkerConfig, ObjCodec};
pub use gcodeobj_host::{
    AppState, JobSnapshot, JobState, JobStateProvider, ObjPayload, ObjQueryService, PathResolver,
    QueryError, SharedJobState, UploadsPathResolver,
};
pub use gcodeobj_mesh::{inject_mesh, MeshConverter, ObjMesh, StlToObj};
pub use gcodeobj_settings::Config;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Build the log filter
///
/// An explicit `level` wins outright. Otherwise `rust_log` (the `RUST_LOG`
/// value) decides, falling back to `info` when unset or empty.
pub fn log_filter(rust_log: Option<&str>, level: Option<tracing::Level>) -> EnvFilter {
    let (default, directives) = match level {
        Some(level) => (LevelFilter::from_level(level), ""),
        None => (LevelFilter::INFO, rust_log.unwrap_or_default()),
    };

    EnvFilter::builder()
        .with_default_directive(default.into())
        .parse_lossy(directives)
}

/// Initialize logging
///
/// Sets up structured logging with:
/// - stderr output, so extracted OBJ text on stdout stays clean
/// - RUST_LOG environment variable support
/// - `level`, when given, overriding the default level
pub fn init_logging(level: Option<tracing::Level>) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let env_filter = log_filter(rust_log.as_deref(), level);

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_names(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level_is_info() {
        assert_eq!(log_filter(None, None).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(log_filter(Some(""), None).max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_rust_log_is_honoured() {
        assert_eq!(
            log_filter(Some("debug"), None).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
    }

    #[test]
    fn test_explicit_level_wins() {
        assert_eq!(
            log_filter(Some("debug"), Some(tracing::Level::WARN)).max_level_hint(),
            Some(LevelFilter::WARN)
        );
        assert_eq!(
            log_filter(None, Some(tracing::Level::TRACE)).max_level_hint(),
            Some(LevelFilter::TRACE)
        );
    }
}
