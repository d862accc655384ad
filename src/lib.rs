//! Techcrawl: a technology fingerprinting crawler
//!
//! This crate crawls a website from a seed URL, renders each page to capture
//! its runtime signals (headers, HTML, globals, scripts, robots.txt), hands
//! them to a fingerprinting engine and merges the detections into one report.

pub mod config;
pub mod crawler;
pub mod detector;
pub mod driver;
pub mod output;
pub mod render;
pub mod robots;
pub mod signals;
pub mod url;

use thiserror::Error;

/// Main error type for Techcrawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] detector::CatalogError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid seed URL: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Techcrawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use crate::config::CrawlOptions;
pub use crate::driver::Driver;
pub use crate::output::{CrawlResult, DetectedApplication};
pub use crate::signals::PageSignals;
pub use crate::url::FrontierUrl;
