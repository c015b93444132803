//! Domain types for the moderation pipeline.

pub mod criteria;
pub mod record;
pub mod request;
pub mod view;

pub use criteria::{DateRange, QueryCriteria, SortDirection, SortKey, StatusFilter};
pub use record::{
    DateEntry, DateWindow, Location, RawDateEntry, RawRevision, RecordDetails, Revision,
};
pub use request::{ModerationRequest, RecordSummary, RequestStatus};
pub use view::{StatusCounts, ViewRecord, UNTITLED_PLACEHOLDER};
