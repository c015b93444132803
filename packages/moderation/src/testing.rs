//! Testing utilities including an in-memory moderation backend.
//!
//! [`MockModerationApi`] implements all three source traits over shared
//! in-memory state, so a console wired to it behaves like one wired to the
//! real services: updates change what the next list call returns.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use conference_api::{RequestListQuery, SortBy, SortOrder, StatusUpdate};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use crate::error::{SourceError, SourceResult};
use crate::traits::{DetailSource, RequestSource, StatusUpdater};
use crate::types::{ModerationRequest, RecordDetails, RequestStatus};

/// Reviewer id the mock stamps onto updated requests.
pub const MOCK_REVIEWER: &str = "mock-admin";

/// A mock backend for the moderation console.
///
/// Listing applies the status and created-date filters and timestamp sort the
/// way the listing service does. Detail lookups can be made to fail or stall
/// per record.
#[derive(Default)]
pub struct MockModerationApi {
    /// Stored requests in insertion order
    requests: Arc<RwLock<Vec<ModerationRequest>>>,

    /// Records by id
    details: Arc<RwLock<HashMap<String, RecordDetails>>>,

    /// Per-record lookup failures
    detail_failures: Arc<RwLock<HashMap<String, SourceError>>>,

    /// Per-record lookup delays
    detail_delays: Arc<RwLock<HashMap<String, Duration>>>,

    /// Delay before every list call answers
    list_delay: Arc<RwLock<Option<Duration>>>,

    /// When set, every list call fails with this
    list_failure: Arc<RwLock<Option<SourceError>>>,

    /// When set, every update call fails with this
    update_failure: Arc<RwLock<Option<SourceError>>>,

    /// Delay before every update call answers
    update_delay: Arc<RwLock<Option<Duration>>>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockCall>>>,
}

/// Record of a call made to the mock.
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    List { query: RequestListQuery },
    Details { record_id: String },
    Update { request_id: String, update: StatusUpdate },
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl MockModerationApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stored request.
    pub fn with_request(self, request: ModerationRequest) -> Self {
        write(&self.requests).push(request);
        self
    }

    /// Add several stored requests, in order.
    pub fn with_requests(self, requests: impl IntoIterator<Item = ModerationRequest>) -> Self {
        write(&self.requests).extend(requests);
        self
    }

    /// Add a record the detail lookup can find.
    pub fn with_details(self, details: RecordDetails) -> Self {
        write(&self.details).insert(details.record_id.clone(), details);
        self
    }

    /// Make lookups of one record fail.
    pub fn with_detail_failure(self, record_id: impl Into<String>, error: SourceError) -> Self {
        write(&self.detail_failures).insert(record_id.into(), error);
        self
    }

    /// Make lookups of one record take `delay` before answering.
    pub fn with_detail_delay(self, record_id: impl Into<String>, delay: Duration) -> Self {
        write(&self.detail_delays).insert(record_id.into(), delay);
        self
    }

    pub fn with_list_delay(self, delay: Duration) -> Self {
        *write(&self.list_delay) = Some(delay);
        self
    }

    pub fn with_update_delay(self, delay: Duration) -> Self {
        *write(&self.update_delay) = Some(delay);
        self
    }

    /// Make (or stop making) every list call fail.
    pub fn set_list_failure(&self, error: Option<SourceError>) {
        *write(&self.list_failure) = error;
    }

    /// Make (or stop making) every update call fail.
    pub fn set_update_failure(&self, error: Option<SourceError>) {
        *write(&self.update_failure) = error;
    }

    /// Change one record's lookup delay after construction.
    pub fn set_detail_delay(&self, record_id: impl Into<String>, delay: Option<Duration>) {
        let record_id = record_id.into();
        let mut delays = write(&self.detail_delays);
        match delay {
            Some(delay) => delays.insert(record_id, delay),
            None => delays.remove(&record_id),
        };
    }

    /// Current stored state of one request.
    pub fn request(&self, request_id: &str) -> Option<ModerationRequest> {
        read(&self.requests)
            .iter()
            .find(|r| r.request_id == request_id)
            .cloned()
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockCall> {
        read(&self.calls).clone()
    }

    /// Queries of every list call, in order.
    pub fn list_calls(&self) -> Vec<RequestListQuery> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MockCall::List { query } => Some(query),
                _ => None,
            })
            .collect()
    }

    /// Record ids of every detail lookup, in call order.
    pub fn detail_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MockCall::Details { record_id } => Some(record_id),
                _ => None,
            })
            .collect()
    }

    pub fn update_calls(&self) -> Vec<(String, StatusUpdate)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MockCall::Update { request_id, update } => Some((request_id, update)),
                _ => None,
            })
            .collect()
    }

    /// Clear call history.
    pub fn clear_calls(&self) {
        write(&self.calls).clear();
    }

    fn record(&self, call: MockCall) {
        write(&self.calls).push(call);
    }
}

fn matches_query(request: &ModerationRequest, query: &RequestListQuery) -> bool {
    let created = request.created_at.date_naive();
    query.status.map_or(true, |status| request.status == status)
        && query.start_date.map_or(true, |start| start <= created)
        && query.end_date.map_or(true, |end| created <= end)
}

#[async_trait]
impl RequestSource for MockModerationApi {
    async fn list_requests(&self, query: &RequestListQuery) -> SourceResult<Vec<ModerationRequest>> {
        self.record(MockCall::List {
            query: query.clone(),
        });

        let delay = *read(&self.list_delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = read(&self.list_failure).clone() {
            return Err(error);
        }

        let mut requests: Vec<ModerationRequest> = read(&self.requests)
            .iter()
            .filter(|r| matches_query(r, query))
            .cloned()
            .collect();

        if let Some(sort_by) = query.sort_by {
            let descending = query.sort_order == Some(SortOrder::Desc);
            requests.sort_by(|a, b| {
                let ordering = match sort_by {
                    SortBy::CreatedAt => a.created_at.cmp(&b.created_at),
                    SortBy::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                };
                if descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        Ok(requests)
    }
}

#[async_trait]
impl DetailSource for MockModerationApi {
    async fn fetch_details(&self, record_id: &str) -> SourceResult<RecordDetails> {
        self.record(MockCall::Details {
            record_id: record_id.to_string(),
        });

        let delay = read(&self.detail_delays).get(record_id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = read(&self.detail_failures).get(record_id).cloned() {
            return Err(error);
        }

        read(&self.details)
            .get(record_id)
            .cloned()
            .ok_or_else(|| SourceError::Api {
                status: 404,
                message: format!("conference {record_id} not found"),
            })
    }
}

#[async_trait]
impl StatusUpdater for MockModerationApi {
    async fn update_status(&self, request_id: &str, update: &StatusUpdate) -> SourceResult<()> {
        self.record(MockCall::Update {
            request_id: request_id.to_string(),
            update: update.clone(),
        });

        let delay = *read(&self.update_delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = read(&self.update_failure).clone() {
            return Err(error);
        }

        let mut requests = write(&self.requests);
        let request = requests
            .iter_mut()
            .find(|r| r.request_id == request_id)
            .ok_or_else(|| SourceError::Api {
                status: 404,
                message: format!("request {request_id} not found"),
            })?;

        request.status = update.status;
        request.reviewer_message = Some(update.message.clone()).filter(|m| !m.is_empty());
        request.reviewer_id = Some(MOCK_REVIEWER.to_string());
        request.updated_at = Utc::now();
        Ok(())
    }
}

fn fixture_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

/// A pending request created at a fixed instant.
pub fn sample_request(request_id: &str, record_id: Option<&str>) -> ModerationRequest {
    ModerationRequest {
        request_id: request_id.to_string(),
        record_id: record_id.map(str::to_string),
        requester_id: "user-1".to_string(),
        reviewer_id: None,
        status: RequestStatus::Pending,
        reviewer_message: None,
        created_at: fixture_time(),
        updated_at: fixture_time(),
        summary: None,
    }
}

/// Like [`sample_request`], with a status and a creation offset in days.
pub fn sample_request_at(
    request_id: &str,
    record_id: Option<&str>,
    status: RequestStatus,
    days_after_fixture: i64,
) -> ModerationRequest {
    let created_at = fixture_time() + chrono::Duration::days(days_after_fixture);
    ModerationRequest {
        status,
        created_at,
        updated_at: created_at,
        ..sample_request(request_id, record_id)
    }
}

pub fn sample_details(record_id: &str, title: &str) -> RecordDetails {
    RecordDetails::new(record_id).with_title(title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_list_applies_status_and_dates() {
        let api = MockModerationApi::new().with_requests([
            sample_request_at("r1", Some("a"), RequestStatus::Pending, 0),
            sample_request_at("r2", Some("b"), RequestStatus::Approved, 5),
            sample_request_at("r3", Some("c"), RequestStatus::Pending, 10),
        ]);

        let pending = api
            .list_requests(&RequestListQuery {
                status: Some(RequestStatus::Pending),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(pending.len(), 2);

        let ranged = api
            .list_requests(&RequestListQuery {
                start_date: NaiveDate::from_ymd_opt(2025, 5, 3),
                end_date: NaiveDate::from_ymd_opt(2025, 5, 8),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(ranged.len(), 1);
        assert_eq!(ranged[0].request_id, "r2");
    }

    #[tokio::test]
    async fn test_list_sorts_by_timestamp() {
        let api = MockModerationApi::new().with_requests([
            sample_request_at("r1", None, RequestStatus::Pending, 0),
            sample_request_at("r2", None, RequestStatus::Pending, 2),
        ]);

        let newest_first = api
            .list_requests(&RequestListQuery {
                sort_by: Some(SortBy::CreatedAt),
                sort_order: Some(SortOrder::Desc),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(newest_first[0].request_id, "r2");
    }

    #[tokio::test]
    async fn test_update_mutates_stored_request() {
        let api = MockModerationApi::new().with_request(sample_request("r1", Some("a")));

        api.update_status(
            "r1",
            &StatusUpdate {
                status: RequestStatus::Rejected,
                message: "duplicate".into(),
            },
        )
        .await
        .unwrap();

        let stored = api.request("r1").unwrap();
        assert_eq!(stored.status, RequestStatus::Rejected);
        assert_eq!(stored.reviewer_message.as_deref(), Some("duplicate"));
        assert_eq!(stored.reviewer_id.as_deref(), Some(MOCK_REVIEWER));
        assert_eq!(api.update_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_record_is_not_found() {
        let api = MockModerationApi::new();
        let err = api.fetch_details("nope").await.unwrap_err();
        assert!(matches!(err, SourceError::Api { status: 404, .. }));
        assert_eq!(api.detail_calls(), vec!["nope".to_string()]);
    }
}
