//! Page signals
//!
//! The normalized per-page bundle handed to the detector: headers, HTML,
//! global variable names, script URLs and the robots policy.

mod extractor;

pub use extractor::{build_header_map, extract_signals};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Signals captured from one rendered page
///
/// Serializes with the field names fingerprinting engines expect
/// (`headers`, `html`, `env`, `scripts`, `robotsTxt`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSignals {
    /// Lowercase header name to every value received for it
    pub headers: BTreeMap<String, Vec<String>>,

    /// Rendered HTML, empty when it could not be extracted
    pub html: String,

    /// Global variable names visible at render time
    pub env: Vec<String>,

    /// Absolute URLs of external scripts
    pub scripts: Vec<String>,

    /// Body of the site's robots.txt, when it could be fetched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub robots_txt: Option<String>,
}

impl PageSignals {
    pub fn with_robots_txt(mut self, robots_txt: Option<String>) -> Self {
        self.robots_txt = robots_txt;
        self
    }
}
