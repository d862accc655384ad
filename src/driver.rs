//! Crawl driver
//!
//! The `Driver` owns everything that lives for the length of a crawl: the
//! normalized options, the visited set, the result aggregator and the
//! collaborators that render pages and detect technologies.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use std::time::Duration;
//! use techcrawl::detector::{CategoryCatalog, CommandDetector};
//! use techcrawl::render::HttpRenderer;
//! use techcrawl::{CrawlOptions, Driver};
//!
//! # async fn run() -> techcrawl::Result<()> {
//! let options = CrawlOptions::default();
//! let renderer = HttpRenderer::new(&options.user_agent, options.request_timeout())?;
//! let detector = CommandDetector::new("wappalyzer-engine", Vec::new(), Duration::from_secs(3));
//! let catalog = CategoryCatalog::load(Path::new("categories.json"))?;
//!
//! let driver = Driver::new(
//!     "https://example.com",
//!     options,
//!     Arc::new(renderer),
//!     Arc::new(detector),
//!     Arc::new(catalog),
//! )?;
//! let result = driver.analyze().await;
//! println!("{} applications", result.applications.len());
//! # Ok(())
//! # }
//! ```

use crate::config::{validate, CrawlOptions};
use crate::crawler::{Crawler, Fetcher, StepTimer, VisitedSet};
use crate::detector::{CategoryCatalog, Detector};
use crate::output::{CrawlReport, CrawlResult, ResultAggregator};
use crate::render::Renderer;
use crate::robots::{HttpRobots, RobotsSource};
use crate::url::FrontierUrl;
use crate::{ConfigError, Result};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Entry point of a crawl
pub struct Driver {
    seed: FrontierUrl,
    options: Arc<CrawlOptions>,
    renderer: Arc<dyn Renderer>,
    detector: Arc<dyn Detector>,
    robots: Arc<dyn RobotsSource>,
    visited: Arc<VisitedSet>,
    aggregator: Arc<ResultAggregator>,
}

impl Driver {
    /// Creates a driver for `seed`
    ///
    /// Options are validated and normalized here; a bad seed or bad options
    /// fail before anything is fetched.
    ///
    /// # Arguments
    ///
    /// * `seed` - Absolute http(s) URL to start from
    /// * `options` - Crawl options
    /// * `renderer` - Renders each page
    /// * `detector` - Fingerprints each rendered page
    /// * `catalog` - Category names for detected applications
    pub fn new(
        seed: &str,
        options: CrawlOptions,
        renderer: Arc<dyn Renderer>,
        detector: Arc<dyn Detector>,
        catalog: Arc<CategoryCatalog>,
    ) -> Result<Self> {
        validate(&options)?;
        let options = options.effective();

        let seed = FrontierUrl::parse(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", seed, e)))?;

        let robots = HttpRobots::new(&options.user_agent, options.request_timeout())?;

        Ok(Self {
            seed,
            options: Arc::new(options),
            renderer,
            detector,
            robots: Arc::new(robots),
            visited: Arc::new(VisitedSet::new()),
            aggregator: Arc::new(ResultAggregator::new(catalog)),
        })
    }

    /// Replaces the robots.txt source
    pub fn with_robots(mut self, robots: Arc<dyn RobotsSource>) -> Self {
        self.robots = robots;
        self
    }

    /// Crawls from the seed and returns every detection
    ///
    /// Returns once the traversal is over and every detection it started
    /// has reported. Page-level failures are logged, never returned.
    pub async fn analyze(&self) -> CrawlResult {
        let timer = Arc::new(StepTimer::new(self.options.debug));
        let (tx, rx) = mpsc::unbounded_channel();

        tracing::info!(
            source = "driver",
            "Analyzing {} (recursive: {}, max depth: {}, max urls: {})",
            self.seed,
            self.options.recursive,
            self.options.max_depth,
            self.options.max_urls
        );

        let fetcher = Fetcher::new(
            Arc::clone(&self.options),
            Arc::clone(&self.renderer),
            Arc::clone(&self.robots),
            Arc::clone(&self.detector),
            Arc::clone(&self.visited),
            tx,
            Arc::clone(&timer),
        );
        let crawler = Crawler::new(
            fetcher,
            Arc::clone(&self.options),
            self.seed.host(),
            Arc::clone(&timer),
        );

        let seed = self.seed.clone();
        let traversal = async move {
            crawler.crawl(seed, 1, 1).await;
            // Dropping the crawler drops the last sender it owns
        };
        tokio::join!(traversal, self.aggregator.consume(rx));

        timer.mark("done");

        let result = self.aggregator.snapshot();
        tracing::info!(
            source = "driver",
            "Finished {}: {} pages, {} applications",
            self.seed,
            self.visited.len(),
            result.applications.len()
        );
        result
    }

    /// Like [`Driver::analyze`], wrapped with run timestamps and visited URLs
    pub async fn analyze_report(&self) -> CrawlReport {
        let started_at = Utc::now();
        let result = self.analyze().await;
        CrawlReport {
            seed: self.seed.to_string(),
            started_at,
            finished_at: Utc::now(),
            visited: self.visited_urls(),
            result,
        }
    }

    /// URLs fetched by this driver, in dispatch order
    pub fn visited_urls(&self) -> Vec<String> {
        self.visited.urls()
    }

    pub fn options(&self) -> &CrawlOptions {
        &self.options
    }
}
