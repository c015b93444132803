//! Moderation requests as returned by the listing source.

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use conference_api::RequestStatus;

/// A pending (or already decided) change request for one conference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModerationRequest {
    /// Stable request id; status updates target this.
    pub request_id: String,

    /// Reference to the full record. Requests without one are still shown.
    pub record_id: Option<String>,

    pub requester_id: String,

    /// Set once a reviewer has acted.
    pub reviewer_id: Option<String>,

    pub status: RequestStatus,

    pub reviewer_message: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Limited record summary some listing responses embed.
    pub summary: Option<RecordSummary>,
}

/// Record fields embedded directly in a listing response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordSummary {
    pub title: Option<String>,
    pub short_code: Option<String>,
}

impl ModerationRequest {
    /// The record id if it is present and not blank.
    pub fn record_ref(&self) -> Option<&str> {
        self.record_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    pub fn summary_title(&self) -> Option<&str> {
        self.summary.as_ref().and_then(|s| s.title.as_deref())
    }
}
