use crate::config::HostMatch;

/// Checks if a candidate authority matches the required one
///
/// Two rules are supported:
/// 1. [`HostMatch::Subdomain`]: "example.com" matches
///    - "example.com" (the host itself)
///    - "blog.example.com" and "api.v2.example.com" (any subdomain)
/// 2. [`HostMatch::Contains`]: any candidate containing "example.com",
///    including unrelated hosts such as "evil-example.com"
///
/// Both arguments are expected to be lowercase authorities (see
/// [`super::extract_authority`]).
///
/// # Examples
///
/// ```
/// use ripple_crawl::config::HostMatch;
/// use ripple_crawl::url::matches_host;
///
/// assert!(matches_host(HostMatch::Subdomain, "example.com", "blog.example.com"));
/// assert!(!matches_host(HostMatch::Subdomain, "example.com", "evil-example.com"));
/// assert!(matches_host(HostMatch::Contains, "example.com", "evil-example.com"));
/// ```
pub fn matches_host(rule: HostMatch, required: &str, candidate: &str) -> bool {
    if required.is_empty() || candidate.is_empty() {
        return false;
    }

    match rule {
        HostMatch::Subdomain => {
            candidate == required || candidate.ends_with(&format!(".{}", required))
        }
        HostMatch::Contains => candidate.contains(required),
    }
}
