//! # gcodeobj Host
//!
//! Host integration around the codec:
//! - **JobStateProvider** / **SharedJobState**: the host's print state
//! - **PathResolver** / **UploadsPathResolver**: job path to file on disk
//! - **ObjQueryService**: "mesh of the job currently printing", gated on state
//! - **server**: axum router exposing the query over HTTP

pub mod error;
pub mod job;
pub mod query;
pub mod resolver;
pub mod server;

pub use error::QueryError;
pub use job::{JobSnapshot, JobState, JobStateProvider, SharedJobState};
pub use query::{ObjPayload, ObjQueryService};
pub use resolver::{PathResolver, UploadsPathResolver};
pub use server::{router, serve, AppState};
