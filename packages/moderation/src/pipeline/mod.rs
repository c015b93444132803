//! The aggregation pipeline.
//!
//! - [`aggregate`]: concurrent detail lookups merged into [`ViewRecord`](crate::types::ViewRecord)s
//! - [`apply_query`]: the local search and title sort over an aggregated list
//! - [`dates`]: revision date parsing

pub mod aggregate;
pub mod dates;
pub mod query;

pub use aggregate::{aggregate, merge};
pub use dates::{normalize_date_entry, normalize_revision, parse_point_in_time};
pub use query::apply_query;
