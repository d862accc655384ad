//! Fingerprinting engine interface
//!
//! The detector matches a page's signals against a signature catalog. This
//! crate does not implement the matching itself; it defines what it sends
//! and what it expects back, and ships a detector that delegates to an
//! external program.
//!
//! # Components
//!
//! - `Detector`: the trait the fetcher dispatches pages to
//! - `CommandDetector`: runs an external engine over a JSON stdin/stdout protocol
//! - `CategoryCatalog`: category id to name lookup loaded once per run

mod catalog;
mod command;

pub use catalog::{CatalogError, CategoryCatalog};
pub use command::CommandDetector;

use crate::signals::PageSignals;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from a detection run
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("Failed to start detector: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Detector exited with status {code}: {stderr}")]
    Exit { code: i32, stderr: String },

    #[error("Detector timed out after {0}ms")]
    Timeout(u64),

    #[error("Failed to decode detector output: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One application reported by the detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub name: String,

    /// Total confidence, usually 0-100
    pub confidence: f64,

    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub icon: Option<String>,

    #[serde(default)]
    pub website: Option<String>,

    /// Category ids, resolved to names through the catalog
    #[serde(default)]
    pub categories: Vec<u32>,
}

/// Everything the detector reported for one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionBatch {
    #[serde(default)]
    pub applications: Vec<Detection>,

    /// Engine metadata; opaque to the crawler
    #[serde(default = "empty_meta")]
    pub meta: serde_json::Value,
}

impl Default for DetectionBatch {
    fn default() -> Self {
        Self {
            applications: Vec::new(),
            meta: empty_meta(),
        }
    }
}

pub(crate) fn empty_meta() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// A technology fingerprinting engine
#[async_trait]
pub trait Detector: Send + Sync {
    /// Matches one page's signals
    ///
    /// # Arguments
    ///
    /// * `host` - Hostname of the page
    /// * `url` - The page URL
    /// * `signals` - Signals captured from the rendered page
    async fn detect(
        &self,
        host: &str,
        url: &str,
        signals: &PageSignals,
    ) -> Result<DetectionBatch, DetectorError>;
}
