//! Pure conference admin REST API client.
//!
//! A minimal client for the three admin endpoints the moderation console
//! talks to: listing moderation requests, fetching a conference record, and
//! updating a request's status. No moderation logic lives here.
//!
//! # Example
//!
//! ```rust,ignore
//! use conference_api::{ConferenceApiClient, RequestListQuery, RequestStatus};
//!
//! let client = ConferenceApiClient::from_env()?;
//!
//! let pending = client
//!     .list_requests(&RequestListQuery {
//!         status: Some(RequestStatus::Pending),
//!         ..Default::default()
//!     })
//!     .await?;
//! for request in &pending {
//!     println!("{} -> {:?}", request.id, request.conference_id);
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{ConferenceApiError, Result};
pub use types::{
    ConferenceDate, ConferenceDetails, ConferenceRequest, ConferenceRevision, ConferenceSummary,
    Location, RequestListQuery, RequestStatus, SortBy, SortOrder, StatusUpdate,
};

use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct ConferenceApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl ConferenceApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create from `CONFERENCE_API_URL` and the optional `CONFERENCE_API_TOKEN`.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("CONFERENCE_API_URL")
            .map_err(|_| ConferenceApiError::Config("CONFERENCE_API_URL not set".into()))?;
        let client = Self::new(base_url);
        Ok(match std::env::var("CONFERENCE_API_TOKEN") {
            Ok(token) if !token.is_empty() => client.with_token(token),
            _ => client,
        })
    }

    /// Send a bearer token with every call.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Upper bound for any single call made by this client.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// List moderation requests. The service decides the order unless
    /// `sort_by` is set.
    pub async fn list_requests(&self, query: &RequestListQuery) -> Result<Vec<ConferenceRequest>> {
        let url = self.endpoint(&["admin-conference", "requests"])?;
        tracing::debug!(%url, ?query, "Listing moderation requests");

        let resp = self.authorized(self.client.get(url).query(query)).send().await?;
        let requests: Vec<ConferenceRequest> = parse_json(ensure_success(resp).await?).await?;

        tracing::debug!(count = requests.len(), "Fetched moderation requests");
        Ok(requests)
    }

    /// Fetch the full record for one conference.
    pub async fn get_conference(&self, conference_id: &str) -> Result<ConferenceDetails> {
        if conference_id.trim().is_empty() {
            return Err(ConferenceApiError::Config(
                "conference id must not be empty".into(),
            ));
        }

        let url = self.endpoint(&["conference", conference_id])?;
        tracing::debug!(conference_id, "Fetching conference details");

        let resp = self.authorized(self.client.get(url)).send().await?;
        parse_json(ensure_success(resp).await?).await
    }

    /// Change a request's status. Only the HTTP status of the reply matters.
    pub async fn update_request_status(&self, request_id: &str, update: &StatusUpdate) -> Result<()> {
        let url = self.endpoint(&["admin-conference", "requests", request_id])?;
        tracing::debug!(request_id, status = %update.status, "Updating request status");

        let resp = self
            .authorized(self.client.patch(url).json(update))
            .send()
            .await?;
        ensure_success(resp).await?;
        Ok(())
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.timeout(self.timeout);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Join path segments onto the base URL, escaping each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ConferenceApiError::Config(format!("invalid base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ConferenceApiError::Config("base URL cannot carry a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn ensure_success(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    Err(ConferenceApiError::Api {
        status: status.as_u16(),
        message: body,
    })
}

async fn parse_json<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| ConferenceApiError::Parse(e.to_string()))
}
