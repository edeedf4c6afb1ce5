//! HTML parser for extracting anchor links
//!
//! Every `<a href="...">` is resolved against the page URL and reported in
//! document order. Only repeats within the same page are dropped; global
//! de-duplication belongs to the frontier.

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts the absolute URLs of all anchors in an HTML document
///
/// Relative (`page2`, `/docs`), protocol-relative (`//cdn.example.com/x`) and
/// absolute hrefs are resolved per standard URL joining. Hrefs that cannot be
/// resolved are skipped.
///
/// When `escape_hrefs` is set, the raw href is HTML-escaped before joining,
/// so `?a=1&b=2` becomes `?a=1&amp;b=2`. This reproduces historical crawl
/// output and is off by default.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The URL the page was fetched from
/// * `escape_hrefs` - Whether to HTML-escape hrefs before resolution
///
/// # Example
///
/// ```
/// use ripple_crawl::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<a href="/a">A</a><a href="b">B</a><a href="/a">A again</a>"#;
/// let base = Url::parse("https://example.com/dir/page").unwrap();
/// let links = extract_links(html, &base, false);
/// assert_eq!(links, vec![
///     "https://example.com/a".to_string(),
///     "https://example.com/dir/b".to_string(),
/// ]);
/// ```
pub fn extract_links(html: &str, base_url: &Url, escape_hrefs: bool) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    let Ok(anchor_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&anchor_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let resolved = if escape_hrefs {
            resolve_link(&html_escape::encode_quoted_attribute(href), base_url)
        } else {
            resolve_link(href, base_url)
        };

        match resolved {
            Some(absolute_url) => {
                if seen.insert(absolute_url.clone()) {
                    links.push(absolute_url);
                }
            }
            None => tracing::debug!("Skipping unresolvable href {:?} on {}", href, base_url),
        }
    }

    links
}

fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    base_url.join(href).ok().map(String::from)
}
