use crate::render::RenderedPage;
use crate::signals::PageSignals;
use std::collections::BTreeMap;

/// Groups header pairs by lowercase name, keeping values in arrival order
///
/// # Example
///
/// ```
/// use techcrawl::signals::build_header_map;
///
/// let headers = vec![
///     ("Set-Cookie".to_string(), "a=1".to_string()),
///     ("server".to_string(), "nginx".to_string()),
///     ("set-cookie".to_string(), "b=2".to_string()),
/// ];
/// let map = build_header_map(&headers);
/// assert_eq!(map["set-cookie"], vec!["a=1", "b=2"]);
/// assert_eq!(map["server"], vec!["nginx"]);
/// ```
pub fn build_header_map(headers: &[(String, String)]) -> BTreeMap<String, Vec<String>> {
    let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for (name, value) in headers {
        map.entry(name.to_ascii_lowercase())
            .or_default()
            .push(value.clone());
    }

    map
}

/// Builds the signal bundle for a rendered page
///
/// A page whose HTML could not be extracted gets an empty string. Script
/// elements without a `src` are dropped. The robots policy is attached
/// separately once it has been fetched.
pub fn extract_signals(page: &RenderedPage) -> PageSignals {
    PageSignals {
        headers: build_header_map(&page.headers),
        html: page.html.clone().unwrap_or_default(),
        env: page.globals.clone(),
        scripts: page
            .scripts
            .iter()
            .filter(|src| !src.trim().is_empty())
            .cloned()
            .collect(),
        robots_txt: None,
    }
}
