//! DOM extraction for the built-in renderer
//!
//! Pulls script sources, link targets and global variable names out of an
//! HTML document with `scraper`.

use scraper::{Html, Selector};
use url::Url;

/// What the renderer reads out of a parsed document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedDocument {
    /// `src` of every `<script>`, empty values included
    pub scripts: Vec<String>,

    /// Absolute HTTP(S) targets of `<a href>` elements
    pub links: Vec<String>,

    /// Global names declared at the top level of inline scripts
    pub globals: Vec<String>,
}

/// Parses HTML and extracts scripts, links and globals
///
/// # Link Extraction Rules
///
/// **Include:** `<a href="...">`, resolved against `base_url`
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` and data URIs
/// - Anything that is not HTTP(S) after resolution
///
/// Fragments are kept here; the crawler strips them before deduplication.
///
/// # Example
///
/// ```
/// use techcrawl::render::extract_document;
/// use url::Url;
///
/// let html = r#"<html><body><script src="/app.js"></script><a href="/about">About</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let doc = extract_document(html, &base_url);
/// assert_eq!(doc.scripts, vec!["https://example.com/app.js"]);
/// assert_eq!(doc.links, vec!["https://example.com/about"]);
/// ```
pub fn extract_document(html: &str, base_url: &Url) -> ExtractedDocument {
    let document = Html::parse_document(html);

    ExtractedDocument {
        scripts: extract_scripts(&document, base_url),
        links: extract_links(&document, base_url),
        globals: extract_globals(&document),
    }
}

fn extract_scripts(document: &Html, base_url: &Url) -> Vec<String> {
    let Ok(selector) = Selector::parse("script") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .map(|element| match element.value().attr("src").map(str::trim) {
            Some(src) if !src.is_empty() => base_url
                .join(src)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| src.to_string()),
            _ => String::new(),
        })
        .collect()
}

fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves a link href to an absolute URL
///
/// Returns None for special schemes, unparseable hrefs and non-HTTP(S)
/// targets.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => {
            Some(absolute_url.to_string())
        }
        _ => None,
    }
}

/// Approximates the page's global variables without running JavaScript
///
/// Picks up `var`/`let`/`const`/`function` declarations at the start of a
/// line and `window.NAME =` assignments inside inline scripts.
fn extract_globals(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("script:not([src])") else {
        return Vec::new();
    };

    let mut globals: Vec<String> = Vec::new();

    for element in document.select(&selector) {
        let source = element.text().collect::<String>();
        for line in source.lines() {
            for name in declared_names(line.trim()) {
                if !globals.contains(&name) {
                    globals.push(name);
                }
            }
        }
    }

    globals
}

fn declared_names(line: &str) -> Vec<String> {
    let mut names = Vec::new();

    for statement in split_top_level(line, ';') {
        let statement = statement.trim();

        if let Some(rest) = statement.strip_prefix("function ") {
            names.extend(leading_identifier(rest.trim_start()));
            continue;
        }

        let Some(rest) = ["var ", "let ", "const "]
            .iter()
            .find_map(|keyword| statement.strip_prefix(keyword))
        else {
            continue;
        };

        // var a = 1, b = f(x, y), c;
        for declarator in split_top_level(rest, ',') {
            let declarator = declarator.trim_start();
            if let Some(name) = leading_identifier(declarator) {
                let after = declarator[name.len()..].trim_start();
                if after.is_empty() || (after.starts_with('=') && !after.starts_with("==")) {
                    names.push(name);
                }
            }
        }
    }

    let mut rest = line;
    while let Some(pos) = rest.find("window.") {
        rest = &rest[pos + "window.".len()..];
        if let Some(name) = leading_identifier(rest) {
            let after = rest[name.len()..].trim_start();
            if after.starts_with('=') && !after.starts_with("==") {
                names.push(name);
            }
        }
    }

    names
}

/// Splits `text` on `separator` outside brackets and string literals
fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }

    parts.push(&text[start..]);
    parts
}

fn leading_identifier(text: &str) -> Option<String> {
    let name: String = text
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '$')
        .collect();

    match name.chars().next() {
        Some(first) if !first.is_ascii_digit() => Some(name),
        _ => None,
    }
}
