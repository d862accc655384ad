//! Built-in HTTP renderer
//!
//! Fetches the document with reqwest and reads the DOM with scraper. No
//! JavaScript runs, so global variables are approximated from inline script
//! declarations and only links present in the served HTML are found.

use crate::render::extract::extract_document;
use crate::render::{RenderError, RenderedPage, Renderer};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Renderer backed by a plain HTTP client
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    /// Builds a renderer with its own HTTP client
    ///
    /// # Arguments
    ///
    /// * `user_agent` - User agent header for every request
    /// * `timeout` - Overall timeout for each request
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::time::Duration;
    /// use techcrawl::render::HttpRenderer;
    ///
    /// let renderer = HttpRenderer::new("Mozilla/5.0 (compatible; Wappalyzer)", Duration::from_secs(3)).unwrap();
    /// ```
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(user_agent, timeout)?,
        })
    }
}

/// Builds an HTTP client with the crawl's user agent and timeout
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(timeout)
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

#[async_trait]
impl Renderer for HttpRenderer {
    /// Loads the page and reads its body within the wait budget
    ///
    /// The body download is this renderer's wait phase: when it outlasts a
    /// non-zero `wait_budget` the page comes back with headers only and
    /// `wait_error` set. A zero budget leaves the download bounded by the
    /// client timeout alone.
    async fn render(&self, url: &str, wait_budget: Duration) -> Result<RenderedPage, RenderError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RenderError::NoResponse {
                url: url.to_string(),
                reason: describe_request_error(&e),
            })?;

        let final_url = response.url().clone();
        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let mut page = RenderedPage {
            final_url: final_url.to_string(),
            status: Some(status),
            headers,
            ..RenderedPage::default()
        };

        let body = if wait_budget.is_zero() {
            Ok(response.text().await)
        } else {
            tokio::time::timeout(wait_budget, response.text()).await
        };

        match body {
            Ok(Ok(html)) => {
                fill_from_document(&mut page, &html, &final_url);
                page.html = Some(html);
            }
            Ok(Err(e)) => {
                tracing::debug!(source = "browser", "Failed to read body of {}: {}", url, e);
            }
            Err(_elapsed) => {
                page.wait_error = Some(format!(
                    "Timed out after {}ms waiting for {}",
                    wait_budget.as_millis(),
                    url
                ));
            }
        }

        Ok(page)
    }

    fn name(&self) -> &str {
        "http"
    }
}

fn fill_from_document(page: &mut RenderedPage, html: &str, base_url: &Url) {
    let document = extract_document(html, base_url);
    page.scripts = document.scripts;
    page.links = document.links;
    page.globals = document.globals;
}

fn describe_request_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else {
        e.to_string()
    }
}
