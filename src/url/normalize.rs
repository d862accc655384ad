use crate::{UrlError, UrlResult};
use url::Url;

/// Parses a URL into the form used as a frontier entry
///
/// # Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Accept only HTTP and HTTPS schemes
/// 3. Require a host
/// 4. Remove the fragment (everything after #)
///
/// Nothing else is canonicalized: trailing slashes, default ports and query
/// parameter order are kept as written, so two URLs are the same frontier
/// entry only when their strings match once the fragment is gone.
///
/// # Examples
///
/// ```
/// use techcrawl::url::frontier_url;
///
/// let url = frontier_url("https://example.com/page#section").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
/// ```
pub fn frontier_url(url_str: &str) -> UrlResult<Url> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    strip_fragment(&mut url);

    Ok(url)
}

/// Removes the fragment from a URL in place
pub fn strip_fragment(url: &mut Url) {
    url.set_fragment(None);
}
