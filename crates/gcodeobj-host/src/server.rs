//! HTTP endpoints
//!
//! - `GET /api/obj` - mesh of the job currently printing
//! - `GET /api/job` - current job snapshot
//! - `PUT /api/job` - host pushes a new job snapshot
//! - `GET /api/version` - version and build date
//!
//! Errors are returned as `{"Error": "<message>"}`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use gcodeobj_core::CodecError;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::QueryError;
use crate::job::{JobSnapshot, JobStateProvider, SharedJobState};
use crate::query::{ObjPayload, ObjQueryService};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    /// Gated extraction service
    pub service: Arc<ObjQueryService>,
    /// Job state the host pushes into
    pub jobs: SharedJobState,
    /// Build date reported by `/api/version`
    pub build_date: &'static str,
}

/// JSON error payload
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    #[serde(rename = "Error")]
    pub error: String,
}

/// Version payload
#[derive(Debug, Serialize)]
pub struct VersionInfo {
    pub version: &'static str,
    pub build_date: &'static str,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

/// HTTP status for a failed query
pub fn status_for(err: &QueryError) -> StatusCode {
    match err {
        QueryError::NotPrinting { .. } | QueryError::NoJobFile => StatusCode::CONFLICT,
        QueryError::PathRejected { .. } => StatusCode::FORBIDDEN,
        QueryError::Codec(CodecError::PayloadAbsent) => StatusCode::NOT_FOUND,
        QueryError::Codec(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Build the router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/obj", get(get_obj))
        .route("/api/job", get(get_job).put(put_job))
        .route("/api/version", get(get_version))
        .with_state(state)
}

/// Handle `GET /api/obj`
pub async fn get_obj(State(state): State<AppState>) -> Response {
    let service = Arc::clone(&state.service);

    match tokio::task::spawn_blocking(move || service.query()).await {
        Ok(Ok(ObjPayload::Inline(text))) => {
            ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text).into_response()
        }
        Ok(Ok(ObjPayload::DerivedFile(derived))) => {
            // A concurrent request may already be rewriting the file on disk
            let name = derived
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "mesh.obj".to_string());
            (
                [
                    (header::CONTENT_TYPE, "application/octet-stream".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", name),
                    ),
                ],
                derived.text,
            )
                .into_response()
        }
        Ok(Err(err)) => {
            let status = status_for(&err);
            if status.is_server_error() {
                error!("OBJ query failed: {}", err);
            } else {
                warn!("OBJ query rejected: {}", err);
            }
            error_response(status, err.message())
        }
        Err(join) => {
            error!("OBJ query task failed: {}", join);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}

/// Handle `GET /api/job`
pub async fn get_job(State(state): State<AppState>) -> Json<JobSnapshot> {
    Json(state.jobs.current_job())
}

/// Handle `PUT /api/job`
pub async fn put_job(
    State(state): State<AppState>,
    Json(snapshot): Json<JobSnapshot>,
) -> Json<JobSnapshot> {
    info!(
        "Host job update: {} {}",
        snapshot.state,
        snapshot.file.as_deref().unwrap_or("")
    );
    state.jobs.set(snapshot.clone());
    Json(snapshot)
}

/// Handle `GET /api/version`
pub async fn get_version(State(state): State<AppState>) -> Json<VersionInfo> {
    Json(VersionInfo {
        version: env!("CARGO_PKG_VERSION"),
        build_date: state.build_date,
    })
}

/// Serve the router on `addr` until Ctrl-C
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
