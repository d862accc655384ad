//! Output module for crawl results and reports
//!
//! This module handles:
//! - Aggregating detector results across pages
//! - The final `CrawlResult` and its report wrapper
//! - Rendering reports as JSON or markdown

mod aggregator;
mod markdown;
mod types;

pub use aggregator::ResultAggregator;
pub use markdown::format_markdown_report;
pub use types::{CategoryRef, CrawlReport, CrawlResult, DetectedApplication, DEFAULT_ICON};

use crate::CrawlError;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Serializes a crawl result as pretty-printed JSON
pub fn format_json_result(result: &CrawlResult) -> Result<String, CrawlError> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Writes rendered report text to a file, or stdout when no path is given
///
/// # Arguments
///
/// * `content` - The rendered report
/// * `output_path` - Destination file; `None` prints to stdout
pub fn write_report(content: &str, output_path: Option<&Path>) -> Result<(), CrawlError> {
    match output_path {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                file.write_all(b"\n")?;
            }
        }
        None => println!("{}", content.trim_end()),
    }

    Ok(())
}
