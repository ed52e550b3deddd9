//! OBJ query for the job currently printing
//!
//! The gate runs first: unless the host reports `PRINTING`, the query
//! returns `NotPrinting` without resolving a path or opening a file.

use std::sync::Arc;

use gcodeobj_core::{DerivedObj, ExtractMode, ObjCodec};
use gcodeobj_settings::Config;
use tracing::{debug, info};

use crate::error::QueryError;
use crate::job::JobStateProvider;
use crate::resolver::{PathResolver, UploadsPathResolver};

/// Payload of a successful query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjPayload {
    /// OBJ text held in memory
    Inline(String),
    /// OBJ text written to the derived sibling file
    DerivedFile(DerivedObj),
}

/// Gated extraction service
pub struct ObjQueryService {
    codec: ObjCodec,
    mode: ExtractMode,
    jobs: Arc<dyn JobStateProvider>,
    resolver: Arc<dyn PathResolver>,
}

impl ObjQueryService {
    /// Create a service from explicit parts
    pub fn new(
        codec: ObjCodec,
        mode: ExtractMode,
        jobs: Arc<dyn JobStateProvider>,
        resolver: Arc<dyn PathResolver>,
    ) -> Self {
        Self {
            codec,
            mode,
            jobs,
            resolver,
        }
    }

    /// Create a service for `config`, reading job state from `jobs`
    pub fn from_config(
        config: &Config,
        jobs: Arc<dyn JobStateProvider>,
    ) -> Result<Self, QueryError> {
        let codec = ObjCodec::new(config.marker.clone())?;
        let resolver = Arc::new(UploadsPathResolver::from_settings(&config.host));
        Ok(Self::new(codec, config.extract.mode, jobs, resolver))
    }

    /// Delivery mode in use
    pub fn mode(&self) -> ExtractMode {
        self.mode
    }

    /// Extract the mesh of the job currently printing
    pub fn query(&self) -> Result<ObjPayload, QueryError> {
        let job = self.jobs.current_job();
        if !job.state.is_printing() {
            debug!("OBJ query refused, host state is {}", job.state);
            return Err(QueryError::NotPrinting { state: job.state });
        }

        let job_path = job.file.ok_or(QueryError::NoJobFile)?;
        let path = self.resolver.resolve(&job_path)?;
        info!("Extracting OBJ from {} ({} mode)", path.display(), self.mode);

        let payload = match self.mode {
            ExtractMode::Inline => ObjPayload::Inline(self.codec.extract_obj(&path)?),
            ExtractMode::DerivedFile => ObjPayload::DerivedFile(self.codec.extract_to_derived(&path)?),
        };
        Ok(payload)
    }
}
