//! Display-ready records produced by the aggregator.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::criteria::StatusFilter;
use super::record::{DateEntry, Revision};
use super::request::RequestStatus;

/// Title shown when neither the record nor the request carries one.
pub const UNTITLED_PLACEHOLDER: &str = "Untitled Conference";

/// One request merged with its record details.
///
/// Built fresh on every aggregation pass and never patched afterwards; a
/// refetch replaces the whole list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewRecord {
    pub request_id: String,
    pub record_id: Option<String>,
    pub requester_id: String,
    pub reviewer_id: Option<String>,
    pub status: RequestStatus,
    pub reviewer_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    pub title: String,
    pub short_code: Option<String>,
    pub owner_id: Option<String>,
    pub revisions: Vec<Revision>,

    /// Why the record details could not be merged, if they could not.
    pub details_error: Option<String>,
}

impl ViewRecord {
    pub fn has_details(&self) -> bool {
        self.details_error.is_none()
    }

    /// The revision that holds the record's main info.
    pub fn primary_revision(&self) -> Option<&Revision> {
        self.revisions.first()
    }

    /// Labelled dates of the primary revision, undated entries included.
    pub fn important_dates(&self) -> &[DateEntry] {
        self.primary_revision()
            .map(|revision| revision.dates.as_slice())
            .unwrap_or_default()
    }

    /// Revisions that take part in date display.
    pub fn dated_revisions(&self) -> impl Iterator<Item = &Revision> {
        self.revisions.iter().filter(|r| r.is_dated())
    }

    /// Statuses a reviewer can move this request to.
    pub fn available_actions(&self) -> Vec<RequestStatus> {
        [
            RequestStatus::Approved,
            RequestStatus::Rejected,
            RequestStatus::Pending,
        ]
        .into_iter()
        .filter(|status| *status != self.status)
        .collect()
    }
}

/// Per-status totals over an aggregated list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub all: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl StatusCounts {
    pub fn from_records(records: &[ViewRecord]) -> Self {
        records.iter().fold(Self::default(), |mut counts, record| {
            counts.all += 1;
            match record.status {
                RequestStatus::Pending => counts.pending += 1,
                RequestStatus::Approved => counts.approved += 1,
                RequestStatus::Rejected => counts.rejected += 1,
            }
            counts
        })
    }

    pub fn get(&self, filter: StatusFilter) -> usize {
        match filter {
            StatusFilter::All => self.all,
            StatusFilter::Pending => self.pending,
            StatusFilter::Approved => self.approved,
            StatusFilter::Rejected => self.rejected,
        }
    }
}
