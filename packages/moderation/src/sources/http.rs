//! Sources backed by the conference admin REST API.

use async_trait::async_trait;
use conference_api::{
    ConferenceApiClient, ConferenceApiError, ConferenceDate, ConferenceDetails,
    ConferenceRequest, ConferenceRevision, RequestListQuery, StatusUpdate,
};

use crate::error::{SourceError, SourceResult};
use crate::traits::{DetailSource, RequestSource, StatusUpdater};
use crate::types::{ModerationRequest, RawDateEntry, RawRevision, RecordDetails, RecordSummary};

impl From<ConferenceRequest> for ModerationRequest {
    fn from(request: ConferenceRequest) -> Self {
        Self {
            request_id: request.id,
            record_id: request.conference_id,
            requester_id: request.user_id,
            reviewer_id: request.admin_id,
            status: request.status,
            reviewer_message: request.message,
            created_at: request.created_at,
            updated_at: request.updated_at,
            summary: request.conference.map(|c| RecordSummary {
                title: c.title,
                short_code: c.acronym,
            }),
        }
    }
}

impl From<ConferenceRevision> for RawRevision {
    fn from(revision: ConferenceRevision) -> Self {
        Self {
            year: revision.year,
            access_type: revision.access_type,
            link: revision.link,
            summary: revision.summary,
            locations: revision.locations.unwrap_or_default(),
            topics: revision.topics.unwrap_or_default(),
            dates: revision
                .conference_dates
                .unwrap_or_default()
                .into_iter()
                .map(RawDateEntry::from)
                .collect(),
        }
    }
}

impl From<ConferenceDate> for RawDateEntry {
    fn from(date: ConferenceDate) -> Self {
        Self {
            from_date: date.from_date,
            to_date: date.to_date,
            kind: date.kind,
            name: date.name,
        }
    }
}

impl From<ConferenceDetails> for RecordDetails {
    fn from(details: ConferenceDetails) -> Self {
        Self {
            record_id: details.id,
            title: details.title,
            short_code: details.acronym,
            owner_id: details.creator_id,
            revisions: details
                .revisions
                .unwrap_or_default()
                .into_iter()
                .map(RawRevision::from)
                .collect(),
        }
    }
}

/// The only mapping from client errors to source errors. Client-side
/// timeouts carry the client's budget so they read the same as the
/// pipeline's own timeouts.
fn source_error(client: &ConferenceApiClient, err: ConferenceApiError) -> SourceError {
    match err {
        ConferenceApiError::Network(message) => SourceError::Network(message),
        ConferenceApiError::Timeout(_) => SourceError::Timeout(client.timeout()),
        ConferenceApiError::Api { status, message } => SourceError::Api { status, message },
        ConferenceApiError::Parse(message) => SourceError::Parse(message),
        ConferenceApiError::Config(message) => SourceError::Invalid(message),
    }
}

#[async_trait]
impl RequestSource for ConferenceApiClient {
    async fn list_requests(&self, query: &RequestListQuery) -> SourceResult<Vec<ModerationRequest>> {
        let requests = ConferenceApiClient::list_requests(self, query)
            .await
            .map_err(|e| source_error(self, e))?;
        Ok(requests.into_iter().map(ModerationRequest::from).collect())
    }
}

#[async_trait]
impl DetailSource for ConferenceApiClient {
    async fn fetch_details(&self, record_id: &str) -> SourceResult<RecordDetails> {
        let details = self
            .get_conference(record_id)
            .await
            .map_err(|e| source_error(self, e))?;
        Ok(details.into())
    }
}

#[async_trait]
impl StatusUpdater for ConferenceApiClient {
    async fn update_status(&self, request_id: &str, update: &StatusUpdate) -> SourceResult<()> {
        self.update_request_status(request_id, update)
            .await
            .map_err(|e| source_error(self, e))
    }
}
