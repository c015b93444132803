//! Detail fan-out and merge.
//!
//! One aggregation pass takes the request list, issues every detail lookup
//! at once, waits for all of them to settle, and merges in list order. A
//! failed lookup only marks its own record.

use futures::future::join_all;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::{SourceError, SourceResult};
use crate::traits::{bounded, DetailSource};
use crate::types::{ModerationRequest, RecordDetails, ViewRecord, UNTITLED_PLACEHOLDER};

use super::dates::normalize_revision;

/// Merge every request with its record details.
///
/// Always returns exactly one [`ViewRecord`] per request, in request order,
/// no matter how the lookups complete.
pub async fn aggregate(
    details: &dyn DetailSource,
    requests: Vec<ModerationRequest>,
    detail_timeout: Duration,
) -> Vec<ViewRecord> {
    let lookups = requests
        .iter()
        .map(|request| lookup(details, request, detail_timeout));
    let outcomes = join_all(lookups).await;

    let records: Vec<ViewRecord> = requests
        .into_iter()
        .zip(outcomes)
        .map(|(request, outcome)| merge(request, outcome))
        .collect();

    let failed = records.iter().filter(|r| !r.has_details()).count();
    info!(
        count = records.len(),
        failed_details = failed,
        "Aggregation pass merged"
    );

    records
}

async fn lookup(
    details: &dyn DetailSource,
    request: &ModerationRequest,
    detail_timeout: Duration,
) -> SourceResult<RecordDetails> {
    let Some(record_id) = request.record_ref() else {
        return Err(SourceError::MissingReference);
    };

    bounded(detail_timeout, details.fetch_details(record_id)).await
}

/// Merge one request with its lookup outcome.
///
/// Title precedence: record title, then the summary title embedded in the
/// request, then [`UNTITLED_PLACEHOLDER`]. Blank titles count as missing.
pub fn merge(request: ModerationRequest, outcome: SourceResult<RecordDetails>) -> ViewRecord {
    let summary = request.summary.clone().unwrap_or_default();

    let (details, details_error) = match outcome {
        Ok(details) => (Some(details), None),
        Err(e) => {
            warn!(
                request_id = %request.request_id,
                record_id = ?request.record_id,
                error = %e,
                "Record details unavailable, keeping request with fallback fields"
            );
            (None, Some(e.to_string()))
        }
    };

    let title = details
        .as_ref()
        .and_then(|d| non_blank(d.title.as_deref()))
        .or_else(|| non_blank(summary.title.as_deref()))
        .unwrap_or(UNTITLED_PLACEHOLDER)
        .to_string();

    let short_code = details
        .as_ref()
        .and_then(|d| non_blank(d.short_code.as_deref()))
        .or_else(|| non_blank(summary.short_code.as_deref()))
        .map(str::to_string);

    let (owner_id, revisions) = match details {
        Some(d) => (
            d.owner_id,
            d.revisions.into_iter().map(normalize_revision).collect(),
        ),
        None => (None, Vec::new()),
    };

    ViewRecord {
        request_id: request.request_id,
        record_id: request.record_id,
        requester_id: request.requester_id,
        reviewer_id: request.reviewer_id,
        status: request.status,
        reviewer_message: request.reviewer_message,
        created_at: request.created_at,
        updated_at: request.updated_at,
        title,
        short_code,
        owner_id,
        revisions,
        details_error,
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
