use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Icon reported when the detector gives none
pub const DEFAULT_ICON: &str = "default.svg";

/// A category attached to a detected application
///
/// Serializes as a single-entry object, `{"22": "Web servers"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRef {
    pub id: u32,
    pub name: String,
}

impl Serialize for CategoryRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.id.to_string(), &self.name)?;
        map.end()
    }
}

/// An application in the final report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedApplication {
    pub name: String,

    /// Confidence as a decimal string, e.g. "100" or "87.5"
    pub confidence: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    pub icon: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    pub categories: Vec<CategoryRef>,
}

/// Final output of a crawl
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrawlResult {
    /// Deduplicated by name, in first-seen order
    pub applications: Vec<DetectedApplication>,

    /// Latest metadata snapshot from the detector
    pub meta: serde_json::Value,
}

impl Default for CrawlResult {
    fn default() -> Self {
        Self {
            applications: Vec::new(),
            meta: crate::detector::empty_meta(),
        }
    }
}

/// A crawl result with run information, for human-readable reports
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub seed: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// URLs fetched, in dispatch order
    pub visited: Vec<String>,

    pub result: CrawlResult,
}

impl CrawlReport {
    pub fn duration_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}
