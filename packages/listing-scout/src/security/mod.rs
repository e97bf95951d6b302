//! Credential handling for the external services.

pub mod credentials;

pub use credentials::ServiceEndpoint;
