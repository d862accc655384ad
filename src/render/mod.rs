//! Page rendering
//!
//! A renderer loads a URL the way a browser would and exposes what the page
//! looks like at runtime: response headers, final HTML, global variable
//! names, script URLs and outbound links.
//!
//! - `Renderer`: the trait the fetcher drives
//! - `HttpRenderer`: built-in renderer over reqwest + scraper (no JavaScript)

mod extract;
mod http;

pub use extract::{extract_document, ExtractedDocument};
pub use http::{build_http_client, HttpRenderer};

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that stop a page from being rendered at all
#[derive(Debug, Error)]
pub enum RenderError {
    /// Server unreachable, connection refused, DNS failure, empty reply
    #[error("No response from server for {url}: {reason}")]
    NoResponse { url: String, reason: String },
}

/// Runtime state of a rendered page
///
/// Fields are whatever the renderer managed to capture. A wait-phase
/// failure leaves `wait_error` set with the rest partially filled; a failed
/// HTML extraction leaves `html` as `None`.
#[derive(Debug, Clone, Default)]
pub struct RenderedPage {
    /// URL after redirects
    pub final_url: String,

    /// HTTP status code of the main document
    pub status: Option<u16>,

    /// Response headers in arrival order; names may repeat
    pub headers: Vec<(String, String)>,

    /// Serialized DOM, `None` when extraction failed
    pub html: Option<String>,

    /// Names of global variables visible after rendering
    pub globals: Vec<String>,

    /// `src` attribute of every script element, resolved where possible
    pub scripts: Vec<String>,

    /// Absolute targets of every link element
    pub links: Vec<String>,

    /// Set when the wait phase timed out or failed
    pub wait_error: Option<String>,
}

/// A browser-like page renderer
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Loads `url` and waits up to `wait_budget` for the page to settle
    ///
    /// Only a missing response is an error; anything after the response
    /// arrives is reported through the partially filled `RenderedPage`.
    async fn render(&self, url: &str, wait_budget: Duration) -> Result<RenderedPage, RenderError>;

    /// Human-readable name for logs
    fn name(&self) -> &str {
        "renderer"
    }
}
