//! Seams between the pipeline and the backend services.

pub mod source;

pub use source::{bounded, DetailSource, RequestSource, StatusUpdater};
