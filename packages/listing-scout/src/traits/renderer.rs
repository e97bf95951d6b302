//! Renderer trait for the browser-automation collaborator.
//!
//! The marketplace builds its pages client-side, so plain HTTP fetches return
//! an empty shell. A `Renderer` loads the URL in a real browser, waits a fixed
//! settle delay, and hands back the rendered markup.
//!
//! # Usage
//!
//! ```rust,ignore
//! use listing_scout::traits::renderer::Renderer;
//!
//! let html = renderer.render("https://www.quintoandar.com.br/imovel/893456789", settle).await?;
//! ```
//!
//! Navigation timeouts are the caller's job: wrap the call in
//! `tokio::time::timeout`. Implementations are configured once (user agent,
//! headless and no-sandbox launch flags) and never per call.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::RenderResult;

/// Renders a URL to its final document markup.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Load `url`, wait `settle`, and return the document markup.
    async fn render(&self, url: &str, settle: Duration) -> RenderResult<String>;

    /// Get the renderer name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}
