use crate::config::types::{ConfigFile, CrawlOptions};
use crate::config::validation::validate;
use crate::ConfigResult;
use std::path::Path;

/// Loads crawl options from a TOML configuration file
///
/// Keys live under a `[crawl]` table; anything missing takes its default.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(CrawlOptions)` - Successfully loaded and validated options
/// * `Err(ConfigError)` - Failed to load, parse, or validate the file
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use techcrawl::config::load_options;
///
/// let options = load_options(Path::new("techcrawl.toml")).unwrap();
/// println!("Max depth: {}", options.max_depth);
/// ```
pub fn load_options(path: &Path) -> ConfigResult<CrawlOptions> {
    let content = std::fs::read_to_string(path)?;
    parse_options(&content)
}

/// Parses and validates crawl options from TOML text
pub fn parse_options(content: &str) -> ConfigResult<CrawlOptions> {
    let file: ConfigFile = toml::from_str(content)?;

    validate(&file.crawl)?;

    Ok(file.crawl)
}
