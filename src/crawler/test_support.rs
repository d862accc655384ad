//! In-memory renderer, detector and robots source for crawler tests

use crate::detector::{Detection, DetectionBatch, Detector, DetectorError};
use crate::render::{RenderError, RenderedPage, Renderer};
use crate::robots::RobotsSource;
use crate::signals::PageSignals;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

/// A rendered page with the given outbound links
pub fn page(links: &[&str]) -> RenderedPage {
    RenderedPage {
        status: Some(200),
        headers: vec![("content-type".to_string(), "text/html".to_string())],
        html: Some("<html></html>".to_string()),
        links: links.iter().map(|l| l.to_string()).collect(),
        ..RenderedPage::default()
    }
}

#[derive(Debug, Clone)]
pub struct RenderCall {
    pub url: String,
    pub wait_budget: Duration,
    pub at: Instant,
}

/// Serves canned pages; unknown URLs render as empty pages
#[derive(Debug, Default)]
pub struct FakeRenderer {
    pages: HashMap<String, RenderedPage>,
    dead: Vec<String>,
    calls: Mutex<Vec<RenderCall>>,
}

impl FakeRenderer {
    pub fn with_page(mut self, url: &str, page: RenderedPage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    pub fn with_no_response(mut self, url: &str) -> Self {
        self.dead.push(url.to_string());
        self
    }

    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn rendered(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.url).collect()
    }

    pub fn wait_budgets(&self) -> Vec<Duration> {
        self.calls().into_iter().map(|c| c.wait_budget).collect()
    }
}

#[async_trait]
impl Renderer for FakeRenderer {
    async fn render(&self, url: &str, wait_budget: Duration) -> Result<RenderedPage, RenderError> {
        self.calls.lock().unwrap().push(RenderCall {
            url: url.to_string(),
            wait_budget,
            at: Instant::now(),
        });
        tokio::task::yield_now().await;

        if self.dead.iter().any(|d| d == url) {
            return Err(RenderError::NoResponse {
                url: url.to_string(),
                reason: "Connection refused".to_string(),
            });
        }

        let mut page = self.pages.get(url).cloned().unwrap_or_else(|| page(&[]));
        page.final_url = url.to_string();
        Ok(page)
    }
}

#[derive(Debug, Clone)]
pub struct DetectCall {
    pub host: String,
    pub url: String,
    pub signals: PageSignals,
}

/// Reports canned detections per URL and records every call
#[derive(Debug, Default)]
pub struct FakeDetector {
    results: HashMap<String, DetectionBatch>,
    failing: Vec<String>,
    calls: Mutex<Vec<DetectCall>>,
}

impl FakeDetector {
    pub fn with_result(mut self, url: &str, apps: &[(&str, f64)], meta: serde_json::Value) -> Self {
        let applications = apps
            .iter()
            .map(|(name, confidence)| Detection {
                name: name.to_string(),
                confidence: *confidence,
                version: None,
                icon: None,
                website: None,
                categories: vec![1],
            })
            .collect();
        self.results
            .insert(url.to_string(), DetectionBatch { applications, meta });
        self
    }

    pub fn with_failure(mut self, url: &str) -> Self {
        self.failing.push(url.to_string());
        self
    }

    pub fn calls(&self) -> Vec<DetectCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Detector for FakeDetector {
    async fn detect(
        &self,
        host: &str,
        url: &str,
        signals: &PageSignals,
    ) -> Result<DetectionBatch, DetectorError> {
        self.calls.lock().unwrap().push(DetectCall {
            host: host.to_string(),
            url: url.to_string(),
            signals: signals.clone(),
        });

        if self.failing.iter().any(|f| f == url) {
            return Err(DetectorError::Timeout(10));
        }

        Ok(self.results.get(url).cloned().unwrap_or_default())
    }
}

/// Answers every robots.txt request with the same text
#[derive(Debug, Default)]
pub struct FixedRobots(pub Option<String>);

#[async_trait]
impl RobotsSource for FixedRobots {
    async fn robots_txt(&self, _page_url: &Url) -> Option<String> {
        self.0.clone()
    }
}
