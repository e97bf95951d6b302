//! Service endpoints with secure credential handling.
//!
//! Uses the `secrecy` crate so tokens never reach logs or debug output.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use url::Url;

/// Base URL of an external service plus its optional shared secret.
pub struct ServiceEndpoint {
    base_url: String,
    secret: Option<SecretString>,
}

impl ServiceEndpoint {
    /// Create an endpoint without credentials. Trailing slashes are dropped.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            secret: None,
        }
    }

    /// Create an endpoint from a URL string, rejecting anything that is not
    /// an absolute http(s) URL.
    pub fn parse(raw: &str) -> Result<Self, url::ParseError> {
        let parsed = Url::parse(raw.trim())?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(url::ParseError::RelativeUrlWithoutBase);
        }
        Ok(Self::new(raw.trim()))
    }

    /// Attach a secret. Empty values are ignored.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        let secret = secret.into();
        if !secret.is_empty() {
            self.secret = Some(SecretString::from(secret));
        }
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Expose the secret value for use.
    ///
    /// Only call this when actually building a request.
    pub fn secret(&self) -> Option<&str> {
        self.secret.as_ref().map(|s| s.expose_secret())
    }

    /// Join `path` onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Clone for ServiceEndpoint {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            secret: self
                .secret()
                .map(|secret| SecretString::from(secret.to_string())),
        }
    }
}

impl fmt::Debug for ServiceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceEndpoint")
            .field("base_url", &self.base_url)
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
