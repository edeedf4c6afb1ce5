//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, for both schedulers.

use ripple_crawl::{crawl, crawl_with_cancellation, fetch_links, Browser, CrawlConfig, CrawlError, FrontierOrder};
use std::collections::HashSet;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds an HTML page whose body is one anchor per link
fn html_page(links: &[String]) -> ResponseTemplate {
    let anchors: String = links
        .iter()
        .map(|link| format!(r#"<a href="{}">link</a>"#, link))
        .collect();

    ResponseTemplate::new(200)
        .set_body_string(format!(
            "<html><head><title>Test</title></head><body>{}</body></html>",
            anchors
        ))
        .insert_header("content-type", "text/html")
}

/// Mounts a page at `page_path` that must be fetched exactly `times` times
async fn mount_page(server: &MockServer, page_path: &str, links: &[String], times: u64) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html_page(links))
        .expect(times)
        .mount(server)
        .await;
}

fn config(max_depth: i64, concurrent: bool) -> CrawlConfig {
    CrawlConfig {
        max_depth,
        concurrent,
        request_timeout_ms: 5_000,
        ..CrawlConfig::default()
    }
}

fn as_set(urls: &[String]) -> HashSet<&str> {
    urls.iter().map(String::as_str).collect()
}

/// Seed A links to {B, C, A}; B links to an off-host D
async fn mount_small_site(server: &MockServer) -> String {
    let base = server.uri();
    mount_page(
        server,
        "/",
        &[format!("{}/b", base), format!("{}/c", base), format!("{}/", base)],
        1,
    )
    .await;
    mount_page(server, "/b", &["http://other.invalid/d".to_string()], 1).await;
    mount_page(server, "/c", &[], 1).await;
    format!("{}/", base)
}

#[tokio::test]
async fn test_locked_crawl_stays_on_host() {
    let server = MockServer::start().await;
    let seed = mount_small_site(&server).await;
    let base = server.uri();

    let result = crawl(&seed, &config(2, false)).await.expect("Crawl failed");

    assert_eq!(result.followed_urls, vec![format!("{}/b", base), format!("{}/c", base)]);
    assert_eq!(result.discovered_urls, vec!["http://other.invalid/d".to_string()]);
    assert_eq!(result.links_found, 1);
    assert_eq!(result.pages_followed, 2);
    assert!(result.broken_urls.is_empty());
    assert_eq!(result.errors, 0);
}

#[tokio::test]
async fn test_unbounded_crawl_terminates_on_small_site() {
    let server = MockServer::start().await;
    let seed = mount_small_site(&server).await;

    let result = crawl(&seed, &config(0, false)).await.expect("Crawl failed");

    // D is dequeued but out of scope, the seed is skipped as already followed
    assert_eq!(result.pages_followed, 2);
    assert!(!result.followed_urls.contains(&"http://other.invalid/d".to_string()));
    assert!(!result.followed_urls.contains(&seed));
}

#[tokio::test]
async fn test_seed_without_trailing_slash_is_not_refollowed() {
    for concurrent in [false, true] {
        let server = MockServer::start().await;
        let base = server.uri();

        mount_page(&server, "/", &[format!("{}/b", base), format!("{}/", base)], 1).await;
        mount_page(&server, "/b", &[], 1).await;

        // `http://host:port` parses to `http://host:port/`, the form its self-link takes
        let result = crawl(&base, &config(2, concurrent))
            .await
            .expect("Crawl failed");

        assert_eq!(result.followed_urls, vec![format!("{}/b", base)]);
        assert_eq!(result.pages_followed, 1);
    }
}

#[tokio::test]
async fn test_broken_link_is_reported() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", &[format!("{}/missing", base)], 1).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let result = crawl(&format!("{}/", base), &config(5, false))
        .await
        .expect("Crawl failed");

    assert_eq!(result.broken_urls, vec![format!("{}/missing", base)]);
    assert_eq!(result.pages_followed, 1);
    assert_eq!(result.errors, 0);
    // Links of the seed page are queued, not recorded as discovered
    assert!(result.discovered_urls.is_empty());
    assert_eq!(result.links_found, 0);
}

#[tokio::test]
async fn test_broken_seed_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let seed = format!("{}/", server.uri());
    let result = crawl(&seed, &config(5, false)).await.expect("Crawl failed");

    assert_eq!(result.broken_urls, vec![seed]);
    assert_eq!(result.pages_followed, 0);
    assert_eq!(result.links_found, 0);
}

#[tokio::test]
async fn test_unreachable_seed_is_an_error() {
    let result = crawl("http://127.0.0.1:1/", &config(5, false)).await;
    assert!(matches!(result, Err(CrawlError::Fetch(_))));
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let config = CrawlConfig {
        max_workers: Some(0),
        ..CrawlConfig::default()
    };
    let result = crawl("http://127.0.0.1:1/", &config).await;
    assert!(matches!(result, Err(CrawlError::Config(_))));
}

#[tokio::test]
async fn test_acyclic_chain_is_fully_followed() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", &[format!("{}/a", base)], 1).await;
    mount_page(&server, "/a", &[format!("{}/b", base)], 1).await;
    mount_page(&server, "/b", &[format!("{}/c", base)], 1).await;
    mount_page(&server, "/c", &[], 1).await;

    let result = crawl(&format!("{}/", base), &config(0, false))
        .await
        .expect("Crawl failed");

    assert_eq!(
        result.followed_urls,
        vec![format!("{}/a", base), format!("{}/b", base), format!("{}/c", base)]
    );
    assert_eq!(result.links_found, 2);
}

#[tokio::test]
async fn test_cycles_fetch_each_page_once() {
    let server = MockServer::start().await;
    let base = server.uri();
    let seed = format!("{}/", base);

    mount_page(&server, "/", &[format!("{}/a", base)], 1).await;
    mount_page(&server, "/a", &[seed.clone(), format!("{}/b", base)], 1).await;
    mount_page(&server, "/b", &[format!("{}/a", base), format!("{}/b", base)], 1).await;

    let result = crawl(&seed, &config(0, false)).await.expect("Crawl failed");

    assert_eq!(result.pages_followed, 2);
    assert_eq!(
        as_set(&result.discovered_urls),
        HashSet::from([seed.as_str(), format!("{}/b", base).as_str(), format!("{}/a", base).as_str()])
    );
}

#[tokio::test]
async fn test_sequential_bound_counts_dequeued_tasks() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", &[format!("{}/a", base)], 1).await;
    mount_page(&server, "/a", &[format!("{}/b", base)], 1).await;
    mount_page(&server, "/b", &[format!("{}/c", base)], 1).await;
    mount_page(&server, "/c", &[format!("{}/d", base)], 1).await;
    mount_page(&server, "/d", &[], 0).await;

    let result = crawl(&format!("{}/", base), &config(2, false))
        .await
        .expect("Crawl failed");

    // Three dequeues happen before the count exceeds the bound of 2
    assert_eq!(result.pages_followed, 3);
    assert!(result.discovered_urls.contains(&format!("{}/d", base)));
    assert!(!result.followed_urls.contains(&format!("{}/d", base)));
}

#[tokio::test]
async fn test_unlocked_crawl_follows_other_hosts() {
    let home = MockServer::start().await;
    let away = MockServer::start().await;

    mount_page(&home, "/", &[format!("{}/x", away.uri())], 1).await;
    mount_page(&away, "/x", &[], 1).await;

    let config = CrawlConfig {
        locked: false,
        ..config(5, false)
    };
    let result = crawl(&format!("{}/", home.uri()), &config)
        .await
        .expect("Crawl failed");

    assert_eq!(result.followed_urls, vec![format!("{}/x", away.uri())]);
}

#[tokio::test]
async fn test_locked_crawl_skips_other_port() {
    let home = MockServer::start().await;
    let away = MockServer::start().await;

    mount_page(&home, "/", &[format!("{}/x", away.uri())], 1).await;
    mount_page(&away, "/x", &[], 0).await;

    let result = crawl(&format!("{}/", home.uri()), &config(5, false))
        .await
        .expect("Crawl failed");

    assert_eq!(result.pages_followed, 0);
}

#[tokio::test]
async fn test_lifo_frontier_order() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", &[format!("{}/a", base), format!("{}/b", base)], 1).await;
    mount_page(&server, "/a", &[], 1).await;
    mount_page(&server, "/b", &[], 1).await;

    let config = CrawlConfig {
        frontier_order: FrontierOrder::Lifo,
        ..config(0, false)
    };
    let result = crawl(&format!("{}/", base), &config)
        .await
        .expect("Crawl failed");

    assert_eq!(
        result.followed_urls,
        vec![format!("{}/b", base), format!("{}/a", base)]
    );
}

#[tokio::test]
async fn test_browser_user_agent_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", Browser::Firefox.user_agent()))
        .respond_with(html_page(&[]))
        .expect(1)
        .mount(&server)
        .await;

    let config = CrawlConfig {
        browser: Browser::Firefox,
        ..config(5, false)
    };
    let result = crawl(&format!("{}/", server.uri()), &config)
        .await
        .expect("Crawl failed");

    assert!(result.broken_urls.is_empty());
}

#[tokio::test]
async fn test_concurrent_crawl_stays_on_host() {
    let server = MockServer::start().await;
    let seed = mount_small_site(&server).await;
    let base = server.uri();

    let result = crawl(&seed, &config(2, true)).await.expect("Crawl failed");

    assert_eq!(
        as_set(&result.followed_urls),
        HashSet::from([format!("{}/b", base).as_str(), format!("{}/c", base).as_str()])
    );
    assert_eq!(result.discovered_urls, vec!["http://other.invalid/d".to_string()]);
    assert_eq!(result.pages_followed, 2);
    assert_eq!(result.errors, 0);
}

#[tokio::test]
async fn test_concurrent_depth_bound() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", &[format!("{}/a", base)], 1).await;
    mount_page(&server, "/a", &[format!("{}/b", base)], 1).await;
    mount_page(&server, "/b", &[format!("{}/c", base)], 1).await;
    mount_page(&server, "/c", &[], 0).await;

    let result = crawl(&format!("{}/", base), &config(2, true))
        .await
        .expect("Crawl failed");

    assert_eq!(
        as_set(&result.followed_urls),
        HashSet::from([format!("{}/a", base).as_str(), format!("{}/b", base).as_str()])
    );
    assert!(result.discovered_urls.contains(&format!("{}/c", base)));
}

#[tokio::test]
async fn test_concurrent_deep_sighting_does_not_hide_shallow_link() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", &[format!("{}/a", base), format!("{}/slow", base)], 1).await;
    mount_page(&server, "/a", &[format!("{}/c", base)], 1).await;
    mount_page(&server, "/c", &[format!("{}/x", base)], 1).await;
    mount_page(&server, "/x", &[], 1).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html_page(&[format!("{}/x", base)]).set_delay(Duration::from_millis(800)))
        .expect(1)
        .mount(&server)
        .await;

    let result = crawl(&format!("{}/", base), &config(2, true))
        .await
        .expect("Crawl failed");

    // /x is depth 3 through /c, which finishes first, but depth 2 through /slow
    assert_eq!(
        as_set(&result.followed_urls),
        HashSet::from([
            format!("{}/a", base).as_str(),
            format!("{}/slow", base).as_str(),
            format!("{}/c", base).as_str(),
            format!("{}/x", base).as_str(),
        ])
    );
    assert_eq!(result.links_found, result.discovered_urls.len());
}

#[tokio::test]
async fn test_concurrent_dense_graph_has_no_duplicates() {
    const PAGES: usize = 12;

    let server = MockServer::start().await;
    let base = server.uri();
    let seed = format!("{}/", base);

    let mut everything: Vec<String> = (0..PAGES).map(|i| format!("{}/p{}", base, i)).collect();
    everything.push(seed.clone());

    mount_page(&server, "/", &everything, 1).await;
    for i in 0..PAGES {
        mount_page(&server, &format!("/p{}", i), &everything, 1).await;
    }

    let config = CrawlConfig {
        max_workers: Some(4),
        ..config(0, true)
    };
    let result = crawl(&seed, &config).await.expect("Crawl failed");

    let followed = as_set(&result.followed_urls);
    assert_eq!(result.followed_urls.len(), PAGES);
    assert_eq!(followed.len(), PAGES);
    assert!(!followed.contains(seed.as_str()));

    let discovered = as_set(&result.discovered_urls);
    assert_eq!(discovered.len(), result.discovered_urls.len());
    assert_eq!(result.links_found, result.discovered_urls.len());
}

#[tokio::test]
async fn test_cancellation_returns_partial_result() {
    for concurrent in [false, true] {
        let server = MockServer::start().await;
        let base = server.uri();

        mount_page(&server, "/", &[format!("{}/slow", base), format!("{}/later", base)], 1).await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(html_page(&[]).set_delay(Duration::from_secs(30)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/later"))
            .respond_with(html_page(&[]).set_delay(Duration::from_secs(30)))
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            trigger.cancel();
        });

        let config = CrawlConfig {
            request_timeout_ms: 60_000,
            ..config(0, concurrent)
        };
        let result = tokio::time::timeout(
            Duration::from_secs(10),
            crawl_with_cancellation(&format!("{}/", base), &config, cancel),
        )
        .await
        .expect("Cancelled crawl did not return")
        .expect("Crawl failed");

        assert!(result.pages_followed <= 2);
        assert!(result.discovered_urls.is_empty());
        assert!(result.elapsed_secs < 10.0);
    }
}

#[tokio::test]
async fn test_fetch_links_lists_page_links() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        &[
            "/a".to_string(),
            "b".to_string(),
            "mailto:someone@example.com".to_string(),
            "/a".to_string(),
        ],
        1,
    )
    .await;

    let links = fetch_links(&format!("{}/", base), Browser::Chromium.user_agent())
        .await
        .expect("Fetch failed");

    assert_eq!(
        links,
        vec![
            (0, format!("{}/a", base)),
            (1, format!("{}/b", base)),
            (2, "mailto:someone@example.com".to_string()),
        ]
    );
}
