//! Per-URL fetch pipeline
//!
//! This module runs one page through the stages:
//! - Claiming the URL in the visited set (dedup + page budget)
//! - Pacing delay proportional to the sibling index
//! - Rendering, with partial results on wait failures
//! - Signal extraction and robots.txt retrieval
//! - Dispatching detection without waiting for it

use crate::config::CrawlOptions;
use crate::crawler::timer::StepTimer;
use crate::crawler::visited::{Claim, VisitedSet};
use crate::detector::{DetectionBatch, Detector};
use crate::render::{RenderError, Renderer};
use crate::robots::RobotsSource;
use crate::signals::{extract_signals, PageSignals};
use crate::url::FrontierUrl;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Fetches single pages and hands their signals to the detector
pub struct Fetcher {
    options: Arc<CrawlOptions>,
    renderer: Arc<dyn Renderer>,
    robots: Arc<dyn RobotsSource>,
    detector: Arc<dyn Detector>,
    visited: Arc<VisitedSet>,
    detections: UnboundedSender<DetectionBatch>,
    timer: Arc<StepTimer>,
}

impl Fetcher {
    /// Creates a fetcher
    ///
    /// Detection results are sent on `detections`; the channel closes once
    /// this fetcher and every detection it started are gone.
    pub fn new(
        options: Arc<CrawlOptions>,
        renderer: Arc<dyn Renderer>,
        robots: Arc<dyn RobotsSource>,
        detector: Arc<dyn Detector>,
        visited: Arc<VisitedSet>,
        detections: UnboundedSender<DetectionBatch>,
        timer: Arc<StepTimer>,
    ) -> Self {
        Self {
            options,
            renderer,
            robots,
            detector,
            visited,
            detections,
            timer,
        }
    }

    /// Fetches one page and returns the links found on it
    ///
    /// # Arguments
    ///
    /// * `url` - The page to fetch
    /// * `index` - 1-based position among its siblings, scales the pacing delay
    /// * `depth` - Recursion depth, the seed being 1
    ///
    /// # Returns
    ///
    /// * `Some(links)` - Outbound links of the rendered page
    /// * `None` - The URL was a duplicate, the page budget is spent, or the
    ///   server never responded
    pub async fn fetch(&self, url: &FrontierUrl, index: usize, depth: u32) -> Option<Vec<String>> {
        self.timer.mark("fetch");

        match self.visited.try_claim(url.as_str(), self.options.max_urls) {
            Claim::Claimed => {}
            Claim::Duplicate => {
                tracing::trace!(source = "driver", "Already visited {}", url);
                return None;
            }
            Claim::BudgetExhausted => {
                tracing::trace!(source = "driver", "Page budget spent, skipping {}", url);
                return None;
            }
        }

        let delay = self.options.pacing_delay(index);
        tracing::debug!(
            source = "driver",
            "depth: {}; delay: {}ms; url: {}",
            depth,
            delay.as_millis(),
            url
        );

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        tracing::trace!(source = "browser", "Rendering {} with {}", url, self.renderer.name());
        let page = match self
            .renderer
            .render(url.as_str(), self.options.render_wait())
            .await
        {
            Ok(page) => page,
            Err(RenderError::NoResponse { reason, .. }) => {
                tracing::warn!(source = "browser", "No response from server for {}: {}", url, reason);
                return None;
            }
        };

        match page.status {
            Some(status) => tracing::debug!(source = "browser", "{} answered {}", url, status),
            None => tracing::debug!(source = "browser", "{} answered without a status", url),
        }
        if !page.final_url.is_empty() && page.final_url != url.as_str() {
            tracing::debug!(source = "browser", "{} redirected to {}", url, page.final_url);
        }
        if let Some(wait_error) = &page.wait_error {
            tracing::warn!(source = "browser", "{}", wait_error);
        }
        if page.html.is_none() {
            tracing::warn!(source = "browser", "Failed to extract HTML from {}", url);
        }
        self.timer.mark("render end");

        let robots_txt = self.robots.robots_txt(url.url()).await;
        let signals = extract_signals(&page).with_robots_txt(robots_txt);

        self.dispatch_detection(url, signals);

        Some(page.links)
    }

    /// Runs detection in the background and forwards its result
    fn dispatch_detection(&self, url: &FrontierUrl, signals: PageSignals) {
        let detector = Arc::clone(&self.detector);
        let detections = self.detections.clone();
        let host = url.host().to_string();
        let page_url = url.as_str().to_string();

        tokio::spawn(async move {
            match detector.detect(&host, &page_url, &signals).await {
                Ok(batch) => {
                    // The receiver only goes away once the crawl is over
                    let _ = detections.send(batch);
                }
                Err(e) => {
                    tracing::warn!(source = "detector", "Detection failed for {}: {}", page_url, e);
                }
            }
        });
    }
}
