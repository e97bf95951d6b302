//! Browserless-based renderer implementation.
//!
//! Talks to a Browserless-compatible rendering service over HTTP. The service
//! runs a headless Chromium, loads the page, waits the settle delay, and
//! returns the final document markup from its `/content` endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::error::{RenderError, RenderResult};
use crate::security::ServiceEndpoint;
use crate::traits::renderer::Renderer;

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Chromium flags for running inside a container.
const LAUNCH_ARGS: &[&str] = &["--no-sandbox", "--disable-setuid-sandbox"];

/// Renderer backed by a Browserless `/content` endpoint.
///
/// # Example
///
/// ```rust,ignore
/// use listing_scout::renderers::BrowserlessRenderer;
/// use listing_scout::security::ServiceEndpoint;
///
/// let endpoint = ServiceEndpoint::new("http://localhost:3000").with_secret(token);
/// let renderer = BrowserlessRenderer::new(endpoint)?.with_user_agent("scout/0.1");
/// let html = renderer.render(url, Duration::from_secs(3)).await?;
/// ```
pub struct BrowserlessRenderer {
    client: Client,
    endpoint: ServiceEndpoint,
    user_agent: String,
}

// Request types for the Browserless API

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContentRequest<'a> {
    url: &'a str,
    user_agent: &'a str,
    goto_options: GotoOptions,
    wait_for_timeout: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GotoOptions {
    wait_until: &'static str,
}

#[derive(Debug, Serialize)]
struct LaunchOptions {
    headless: bool,
    args: &'static [&'static str],
}

impl BrowserlessRenderer {
    /// Create a renderer for the given service endpoint.
    pub fn new(endpoint: ServiceEndpoint) -> RenderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| RenderError::Http(Box::new(e)))?;

        Ok(Self {
            client,
            endpoint,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    /// Set the user agent the browser presents.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    fn request_body<'a>(&'a self, url: &'a str, settle: Duration) -> ContentRequest<'a> {
        ContentRequest {
            url,
            user_agent: &self.user_agent,
            goto_options: GotoOptions {
                wait_until: "networkidle2",
            },
            wait_for_timeout: settle.as_millis() as u64,
        }
    }

    fn launch_options() -> RenderResult<String> {
        serde_json::to_string(&LaunchOptions {
            headless: true,
            args: LAUNCH_ARGS,
        })
        .map_err(|e| RenderError::Http(Box::new(e)))
    }
}

#[async_trait]
impl Renderer for BrowserlessRenderer {
    async fn render(&self, url: &str, settle: Duration) -> RenderResult<String> {
        debug!(url = %url, settle_ms = settle.as_millis() as u64, "Rendering page");

        let mut request = self
            .client
            .post(self.endpoint.url("/content"))
            .query(&[("launch", Self::launch_options()?)])
            .json(&self.request_body(url, settle));
        if let Some(token) = self.endpoint.secret() {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| RenderError::Http(Box::new(e)))?;

        if !response.status().is_success() {
            return Err(RenderError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| RenderError::Http(Box::new(e)))?;

        if html.trim().is_empty() {
            return Err(RenderError::EmptyDocument {
                url: url.to_string(),
            });
        }

        debug!(url = %url, bytes = html.len(), "Rendered page");
        Ok(html)
    }

    fn name(&self) -> &str {
        "browserless"
    }
}
