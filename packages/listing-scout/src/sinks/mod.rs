//! Sink implementations.

pub mod http;

pub use http::{HttpIngestClient, SECRET_HEADER};
