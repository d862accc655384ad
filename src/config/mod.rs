//! Configuration module for Techcrawl
//!
//! This module holds the crawl options, their defaults, and loading from an
//! optional TOML configuration file.
//!
//! # Example
//!
//! ```no_run
//! use techcrawl::config::load_options;
//! use std::path::Path;
//!
//! let options = load_options(Path::new("techcrawl.toml")).unwrap();
//! println!("Crawler will use max depth: {}", options.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ConfigFile, CrawlOptions, DEFAULT_USER_AGENT};

// Re-export parser functions
pub use parser::{load_options, parse_options};
pub use validation::validate;
