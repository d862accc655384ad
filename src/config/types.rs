use serde::Deserialize;
use std::time::Duration;

/// Default user agent sent with page and robots.txt requests
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; Wappalyzer)";

/// Top-level layout of a TOML configuration file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub crawl: CrawlOptions,
}

/// Crawl behavior configuration
///
/// Every field has a default, so a config file only needs the keys it
/// wants to change.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CrawlOptions {
    /// Emit step-by-step debug logging
    pub debug: bool,

    /// Pacing delay multiplied by the sibling index (milliseconds)
    #[serde(rename = "delay")]
    pub delay_ms: u64,

    /// Maximum recursion depth, the seed being depth 1
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Maximum number of distinct URLs fetched per run
    #[serde(rename = "max-urls")]
    pub max_urls: usize,

    /// Budget for the render wait phase (milliseconds)
    #[serde(rename = "max-wait")]
    pub max_wait_ms: u64,

    /// Follow same-host links found on fetched pages
    pub recursive: bool,

    /// Timeout for network requests (milliseconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout_ms: u64,

    /// User agent for page and robots.txt requests
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            debug: false,
            delay_ms: 500,
            max_depth: 3,
            max_urls: 10,
            max_wait_ms: 1000,
            recursive: false,
            request_timeout_ms: 3000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl CrawlOptions {
    /// Returns the options the crawl actually runs with
    ///
    /// Pacing only matters between sibling links, so a non-recursive crawl
    /// never waits.
    pub fn effective(mut self) -> Self {
        if !self.recursive {
            self.delay_ms = 0;
        }
        self
    }

    /// Pacing delay for the sibling at `index` (1-based)
    pub fn pacing_delay(&self, index: usize) -> Duration {
        Duration::from_millis(self.delay_ms.saturating_mul(index as u64))
    }

    pub fn render_wait(&self) -> Duration {
        Duration::from_millis(self.max_wait_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
