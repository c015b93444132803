//! Typed errors for the moderation pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`). `SourceError` is what a
//! backend collaborator reports; its `Display` text is what ends up in a
//! record's `details_error`. `ModerationError` is the pipeline-level error the
//! console surfaces as a single message.

use std::time::Duration;
use thiserror::Error;

/// Errors reported by a request, detail or status-update source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// Connection failed before a response arrived
    #[error("network error: {0}")]
    Network(String),

    /// The call did not settle within its time budget
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Non-success response
    #[error("service returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected shape
    #[error("unexpected response: {0}")]
    Parse(String),

    /// The call could not be built (bad id, bad base URL)
    #[error("invalid request: {0}")]
    Invalid(String),

    /// The request carries no conference reference to look up
    #[error("missing conference reference")]
    MissingReference,
}

/// Pipeline-level errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModerationError {
    /// The request list could not be loaded; the whole pass is void
    #[error("failed to load moderation requests: {0}")]
    ListFetch(#[source] SourceError),

    /// The backend refused or never confirmed a status change
    #[error("failed to update request {request_id}: {source}")]
    StatusUpdate {
        request_id: String,
        #[source]
        source: SourceError,
    },

    /// Illegal workflow transition
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

/// Transitions the workflow state machine refuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("a moderation session is already open")]
    SessionActive,

    #[error("no moderation session is open")]
    NoActiveSession,

    #[error("a status update is already being submitted")]
    SubmissionInFlight,

    #[error("request id must not be empty")]
    EmptyRequestId,
}

/// Result type alias for source operations.
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ModerationError>;
