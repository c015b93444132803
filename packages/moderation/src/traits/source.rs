//! Source traits for the three backend collaborators.
//!
//! The pipeline only ever talks to these traits. The HTTP implementations
//! live in [`crate::sources`]; [`crate::testing`] has an in-memory one.
//!
//! ```rust,ignore
//! use moderation::traits::DetailSource;
//!
//! let details = source.fetch_details("recA").await?;
//! println!("{:?}", details.title);
//! ```

use async_trait::async_trait;
use conference_api::{RequestListQuery, StatusUpdate};
use std::future::Future;
use std::time::Duration;

use crate::error::{SourceError, SourceResult};
use crate::types::{ModerationRequest, RecordDetails};

/// Lists moderation requests matching the server-side criteria.
#[async_trait]
pub trait RequestSource: Send + Sync {
    /// Requests in the order the service returned them.
    async fn list_requests(&self, query: &RequestListQuery) -> SourceResult<Vec<ModerationRequest>>;
}

/// Looks up the full record one request refers to.
#[async_trait]
pub trait DetailSource: Send + Sync {
    /// `record_id` is never blank; the aggregator filters those out first.
    async fn fetch_details(&self, record_id: &str) -> SourceResult<RecordDetails>;
}

/// Applies a status change to one request.
#[async_trait]
pub trait StatusUpdater: Send + Sync {
    async fn update_status(&self, request_id: &str, update: &StatusUpdate) -> SourceResult<()>;
}

/// Run a source call with an upper time bound.
pub async fn bounded<T, F>(limit: Duration, call: F) -> SourceResult<T>
where
    F: Future<Output = SourceResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(SourceError::Timeout(limit)),
    }
}
