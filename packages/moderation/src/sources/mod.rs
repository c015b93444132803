//! Source implementations backed by real services.

pub mod http;
