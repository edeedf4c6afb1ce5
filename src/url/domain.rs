use url::Url;

/// Extracts the authority (host and explicit port) from a URL
///
/// The host is lowercased. Default ports are omitted by the URL parser, so
/// `https://example.com:443/` and `https://example.com/` share an authority.
/// URLs without a host (`mailto:`, `data:`) yield `None`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use ripple_crawl::url::extract_authority;
///
/// let url = Url::parse("https://Example.COM/path").unwrap();
/// assert_eq!(extract_authority(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://localhost:8080/").unwrap();
/// assert_eq!(extract_authority(&url), Some("localhost:8080".to_string()));
/// ```
pub fn extract_authority(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();

    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}
