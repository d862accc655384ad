//! Robots.txt retrieval
//!
//! The robots policy is not enforced here; its text is one of the signals
//! handed to the detector. Retrieval is best-effort: any failure simply
//! leaves the signal out.

use crate::render::build_http_client;
use crate::url::robots_url;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Source of a site's robots.txt text
#[async_trait]
pub trait RobotsSource: Send + Sync {
    /// Returns the robots.txt body for the origin of `page_url`, if any
    async fn robots_txt(&self, page_url: &Url) -> Option<String>;
}

/// Retrieves robots.txt over HTTP
#[derive(Debug, Clone)]
pub struct HttpRobots {
    client: Client,
}

impl HttpRobots {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(user_agent, timeout)?,
        })
    }
}

#[async_trait]
impl RobotsSource for HttpRobots {
    async fn robots_txt(&self, page_url: &Url) -> Option<String> {
        fetch_robots_txt(&self.client, page_url).await
    }
}

/// Fetches robots.txt for the origin of `page_url`
///
/// # Arguments
///
/// * `client` - The HTTP client to use (carries user agent and timeout)
/// * `page_url` - Any URL on the origin of interest
///
/// # Returns
///
/// * `Some(String)` - Body of a successful (2xx), non-empty response
/// * `None` - The request failed, was not successful, or returned nothing
pub async fn fetch_robots_txt(client: &Client, page_url: &Url) -> Option<String> {
    let robots = robots_url(page_url);

    match try_fetch(client, &robots).await {
        Ok(Some(body)) => {
            tracing::debug!(source = "robots", "Fetched {} ({} bytes)", robots, body.len());
            Some(body)
        }
        Ok(None) => {
            tracing::debug!(source = "robots", "No robots.txt at {}", robots);
            None
        }
        Err(e) => {
            tracing::debug!(source = "robots", "Failed to fetch {}: {}", robots, e);
            None
        }
    }
}

async fn try_fetch(client: &Client, robots: &Url) -> Result<Option<String>, reqwest::Error> {
    let response = client.get(robots.as_str()).send().await?;

    if !response.status().is_success() {
        return Ok(None);
    }

    let body = response.text().await?;
    Ok(Some(body).filter(|b| !b.is_empty()))
}
