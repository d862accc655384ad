//! URL handling module for Techcrawl
//!
//! This module provides frontier URL construction, hostname extraction and
//! the same-host filter used when following links.

mod domain;
mod normalize;

use crate::{UrlError, UrlResult};
use std::fmt;
use url::Url;

// Re-export main functions
pub use domain::{extract_host, is_same_host, robots_url};
pub use normalize::{frontier_url, strip_fragment};

/// A URL ready to be handed to the fetcher
///
/// The fragment is already gone, so `as_str` is the exact key used for
/// deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrontierUrl {
    url: Url,
    host: String,
}

impl FrontierUrl {
    /// Parses a frontier URL from a string
    ///
    /// # Examples
    ///
    /// ```
    /// use techcrawl::url::FrontierUrl;
    ///
    /// let url = FrontierUrl::parse("https://Example.com/a#b").unwrap();
    /// assert_eq!(url.as_str(), "https://example.com/a");
    /// assert_eq!(url.host(), "example.com");
    /// ```
    pub fn parse(url_str: &str) -> UrlResult<Self> {
        let url = frontier_url(url_str)?;
        Self::from_url(url)
    }

    /// Wraps an already parsed URL, dropping its fragment
    pub fn from_url(mut url: Url) -> UrlResult<Self> {
        strip_fragment(&mut url);
        let host = extract_host(&url).ok_or(UrlError::MissingHost)?;
        Ok(Self { url, host })
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

impl fmt::Display for FrontierUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// Keeps the links that share `host`, as fragment-free frontier URLs
///
/// Links that fail to parse as absolute HTTP(S) URLs are dropped. Order is
/// preserved and duplicates are kept; the visited set decides what is
/// actually fetched.
pub fn same_host_links(links: &[String], host: &str) -> Vec<FrontierUrl> {
    links
        .iter()
        .filter_map(|link| match FrontierUrl::parse(link) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::trace!(source = "driver", "Skipping link {}: {}", link, e);
                None
            }
        })
        .filter(|url| is_same_host(url.url(), host))
        .collect()
}
