//! Host job state
//!
//! Mirrors the print-state ids a host such as OctoPrint reports
//! (`"PRINTING"`, `"OPERATIONAL"`, ...) and the upload-relative path of the
//! selected job file. The state is read through `JobStateProvider` so the
//! gate can be exercised without a running host.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Print job state as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobState {
    /// No printer connection
    #[default]
    Offline,
    /// Connection being established
    Connecting,
    /// Connected and idle
    Operational,
    /// Job about to start
    Starting,
    /// Job running
    Printing,
    /// Pause requested
    Pausing,
    /// Job paused
    Paused,
    /// Resuming after pause
    Resuming,
    /// Job wrapping up
    Finishing,
    /// Cancel requested
    Cancelling,
    /// Printer reported an error
    Error,
    /// Any state id this crate does not know
    Unknown,
}

impl JobState {
    /// Host state id (`"PRINTING"` etc.)
    pub fn state_id(&self) -> &'static str {
        match self {
            Self::Offline => "OFFLINE",
            Self::Connecting => "CONNECTING",
            Self::Operational => "OPERATIONAL",
            Self::Starting => "STARTING",
            Self::Printing => "PRINTING",
            Self::Pausing => "PAUSING",
            Self::Paused => "PAUSED",
            Self::Resuming => "RESUMING",
            Self::Finishing => "FINISHING",
            Self::Cancelling => "CANCELLING",
            Self::Error => "ERROR",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Parse a host state id; unrecognized ids map to `Unknown`
    pub fn from_state_id(id: &str) -> Self {
        match id {
            "OFFLINE" | "CLOSED" => Self::Offline,
            "CONNECTING" | "OPEN_SERIAL" | "DETECT_SERIAL" => Self::Connecting,
            "OPERATIONAL" => Self::Operational,
            "STARTING" => Self::Starting,
            "PRINTING" => Self::Printing,
            "PAUSING" => Self::Pausing,
            "PAUSED" => Self::Paused,
            "RESUMING" => Self::Resuming,
            "FINISHING" => Self::Finishing,
            "CANCELLING" => Self::Cancelling,
            "ERROR" | "CLOSED_WITH_ERROR" => Self::Error,
            _ => Self::Unknown,
        }
    }

    /// Only an actively printing job passes the gate
    pub fn is_printing(&self) -> bool {
        matches!(self, Self::Printing)
    }
}

impl From<String> for JobState {
    fn from(id: String) -> Self {
        Self::from_state_id(&id)
    }
}

impl From<JobState> for String {
    fn from(state: JobState) -> Self {
        state.state_id().to_string()
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.state_id())
    }
}

/// State plus the selected job file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSnapshot {
    /// Current print state
    pub state: JobState,
    /// Job file path relative to the uploads folder
    #[serde(default)]
    pub file: Option<String>,
}

impl JobSnapshot {
    /// Snapshot of a job in `state` printing `file`
    pub fn new(state: JobState, file: impl Into<String>) -> Self {
        Self {
            state,
            file: Some(file.into()),
        }
    }

    /// Snapshot with no job selected
    pub fn idle(state: JobState) -> Self {
        Self { state, file: None }
    }
}

/// Source of the host's current job
pub trait JobStateProvider: Send + Sync {
    /// The job as the host sees it right now
    fn current_job(&self) -> JobSnapshot;
}

/// Job state kept in-process and pushed by the host integration
#[derive(Debug, Clone, Default)]
pub struct SharedJobState {
    inner: Arc<RwLock<JobSnapshot>>,
}

impl SharedJobState {
    /// Create a provider starting at `snapshot`
    pub fn new(snapshot: JobSnapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(snapshot)),
        }
    }

    /// Replace the current snapshot
    pub fn set(&self, snapshot: JobSnapshot) {
        tracing::debug!(
            "Job state -> {} ({})",
            snapshot.state,
            snapshot.file.as_deref().unwrap_or("no file")
        );
        *self.inner.write() = snapshot;
    }

    /// Change only the state, keeping the selected file
    pub fn set_state(&self, state: JobState) {
        self.inner.write().state = state;
    }
}

impl JobStateProvider for SharedJobState {
    fn current_job(&self) -> JobSnapshot {
        self.inner.read().clone()
    }
}
