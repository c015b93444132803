//! Conference Moderation Pipeline
//!
//! Loads conference change requests, enriches each one with its full
//! conference record, and lets a reviewer approve, reject or reset requests.
//!
//! # Flow
//!
//! 1. One list call fetches the requests matching the server-side criteria
//! 2. Every request's record is looked up concurrently; failures stay local
//!    to their own record
//! 3. Requests and records are merged in list order into [`ViewRecord`]s
//! 4. Title search and title ordering are applied locally
//!
//! A status change goes through the [`workflow`] state machine and is
//! followed by a full refetch, never an in-place patch.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use conference_api::ConferenceApiClient;
//! use moderation::{ModerationConfig, ModerationConsole, RequestStatus, StatusFilter};
//!
//! let client = Arc::new(ConferenceApiClient::from_env()?);
//! let console = ModerationConsole::new(client, ModerationConfig::default());
//!
//! console.set_status_filter(StatusFilter::Pending).await;
//! for record in console.displayed() {
//!     println!("{} {}", record.request_id, record.title);
//! }
//!
//! console.begin_moderation("req1", RequestStatus::Rejected)?;
//! console.set_comment("duplicate submission")?;
//! console.submit_moderation().await?;
//! ```
//!
//! # Modules
//!
//! - [`types`] - Requests, records, view records and query criteria
//! - [`traits`] - Source traits for the listing, detail and update services
//! - [`sources`] - Source implementations over the REST client
//! - [`pipeline`] - Aggregation and the local query engine
//! - [`workflow`] - Review state machine
//! - [`console`] - Stateful facade tying it together
//! - [`display`] - Text formatting helpers
//! - [`testing`] - In-memory backend for tests

pub mod config;
pub mod console;
pub mod display;
pub mod error;
pub mod pipeline;
pub mod sources;
pub mod testing;
pub mod traits;
pub mod types;
pub mod workflow;

pub use config::{CommentPolicy, ModerationConfig};
pub use console::{ModerationConsole, PassOutcome, SubmitOutcome};
pub use error::{ModerationError, Result, SourceError, SourceResult, WorkflowError};
pub use pipeline::{aggregate, apply_query, merge};
pub use traits::{DetailSource, RequestSource, StatusUpdater};
pub use types::{
    DateEntry, DateRange, DateWindow, Location, ModerationRequest, QueryCriteria, RawDateEntry,
    RawRevision, RecordDetails, RecordSummary, RequestStatus, Revision, SortDirection, SortKey,
    StatusCounts, StatusFilter, ViewRecord, UNTITLED_PLACEHOLDER,
};
pub use workflow::{
    action_title, ActionPrompt, Submission, SubmitDecision, WorkflowController, WorkflowSession,
    WorkflowState,
};

pub use testing::MockModerationApi;
