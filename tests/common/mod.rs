//! Shared helpers for fetcher scenario tests

#![allow(dead_code)]

use pinfetch::{FetchConfig, Fetcher, UrlTemplate};
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Fetcher with tight retry delays so failure scenarios stay fast.
pub fn fast_fetcher(cache_dir: &Path) -> Fetcher {
    let mut config = FetchConfig::new(cache_dir);
    config.retry_base_delay = Duration::from_millis(1);
    config.retry_max_delay = Duration::from_millis(2);
    Fetcher::new(config)
}

/// Template pointing at the mock server, version as the first path segment.
pub fn template_for(server: &MockServer) -> UrlTemplate {
    UrlTemplate::new(format!("{}/{{VERSION}}", server.uri())).unwrap()
}

/// Serve `body` for `GET /<version>/<rel>`, expecting exactly `hits` requests
/// over the server's lifetime (verified when the server drops).
pub async fn serve(server: &MockServer, version: &str, rel: &str, body: &str, hits: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/{}/{}", version, rel)))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(hits)
        .mount(server)
        .await;
}

/// Count requests the server saw for `GET /<version>/<rel>`.
pub async fn hits_for(server: &MockServer, version: &str, rel: &str) -> usize {
    let wanted = format!("/{}/{}", version, rel);
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == wanted)
        .count()
}
