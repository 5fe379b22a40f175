//! Acquisition scenarios against a mock HTTP server
//!
//! Covers the cache lifecycle end to end: first fetch, pure cache hits,
//! version changes, stale-marker invalidation, failure atomicity, and the
//! retry policy.

mod common;

use common::{fast_fetcher, hits_for, serve, template_for};
use filetime::FileTime;
use pinfetch::{FetchError, Identity, MARKER_FILE, Manifest, ManifestEntry};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// SHA256 of "int x;\n"
const INT_X_SHA256: &str = "7c725f30854a46033dd94f728ac6b08caf10845993cd3ed48e40079cdb0a76a6";

fn temp_cache() -> TempDir {
    TempDir::new().unwrap()
}

#[tokio::test]
async fn test_first_ensure_downloads_all_files() {
    let server = MockServer::start().await;
    serve(&server, "1.0.0", "include/demo/demo.h", "// header", 1).await;
    serve(&server, "1.0.0", "src/demo.cc", "// impl", 1).await;

    let cache = temp_cache();
    let fetcher = fast_fetcher(cache.path());
    let root = fetcher
        .ensure(
            &Identity::new("demo", "1.0.0"),
            &template_for(&server),
            &Manifest::from_paths(["include/demo/demo.h", "src/demo.cc"]),
        )
        .unwrap();

    assert_eq!(root, cache.path().join("demo/1.0.0"));
    assert_eq!(
        std::fs::read_to_string(root.join("include/demo/demo.h")).unwrap(),
        "// header"
    );
    assert_eq!(
        std::fs::read_to_string(root.join("src/demo.cc")).unwrap(),
        "// impl"
    );
    assert!(root.join(MARKER_FILE).exists());
}

#[tokio::test]
async fn test_second_ensure_is_a_pure_cache_hit() {
    let server = MockServer::start().await;
    // expect(1) on each mock: the second ensure must issue zero requests.
    serve(&server, "1.0.0", "a/x.h", "AAA", 1).await;
    serve(&server, "1.0.0", "b/y.cc", "BBB", 1).await;

    let cache = temp_cache();
    let fetcher = fast_fetcher(cache.path());
    let identity = Identity::new("demo", "1.0.0");
    let template = template_for(&server);
    let manifest = Manifest::from_paths(["a/x.h", "b/y.cc"]);

    let first = fetcher.ensure(&identity, &template, &manifest).unwrap();

    // Age a file so any rewrite would be visible in its mtime.
    let old = FileTime::from_unix_time(1_000_000_000, 0);
    filetime::set_file_mtime(first.join("a/x.h"), old).unwrap();

    let second = fetcher.ensure(&identity, &template, &manifest).unwrap();
    assert_eq!(first, second);
    assert_eq!(std::fs::read_to_string(second.join("a/x.h")).unwrap(), "AAA");

    let meta = std::fs::metadata(second.join("a/x.h")).unwrap();
    assert_eq!(FileTime::from_last_modification_time(&meta), old);
}

#[tokio::test]
async fn test_versions_use_isolated_roots() {
    let server = MockServer::start().await;
    serve(&server, "1.0.0", "lib.h", "one", 1).await;
    serve(&server, "2.0.0", "lib.h", "two", 1).await;

    let cache = temp_cache();
    let fetcher = fast_fetcher(cache.path());
    let template = template_for(&server);
    let manifest = Manifest::from_paths(["lib.h"]);

    let v1 = fetcher
        .ensure(&Identity::new("demo", "1.0.0"), &template, &manifest)
        .unwrap();
    let v2 = fetcher
        .ensure(&Identity::new("demo", "2.0.0"), &template, &manifest)
        .unwrap();

    assert_ne!(v1, v2);
    // The version-1 root is untouched by the version-2 fetch.
    assert_eq!(std::fs::read_to_string(v1.join("lib.h")).unwrap(), "one");
    assert_eq!(std::fs::read_to_string(v2.join("lib.h")).unwrap(), "two");
}

#[tokio::test]
async fn test_stale_marker_forces_full_repopulation() {
    let server = MockServer::start().await;
    // Two hits: the initial fetch, then the re-fetch after invalidation.
    serve(&server, "1.0.0", "lib.h", "fresh", 2).await;

    let cache = temp_cache();
    let fetcher = fast_fetcher(cache.path());
    let identity = Identity::new("demo", "1.0.0");
    let template = template_for(&server);
    let manifest = Manifest::from_paths(["lib.h"]);

    let root = fetcher.ensure(&identity, &template, &manifest).unwrap();

    // Simulate stale state: a marker from an older version plus a leftover
    // file the current manifest does not mention.
    std::fs::write(
        root.join(MARKER_FILE),
        "name = \"demo\"\nversion = \"0.0.1\"\n",
    )
    .unwrap();
    std::fs::write(root.join("stale-only.h"), "old junk").unwrap();

    let root2 = fetcher.ensure(&identity, &template, &manifest).unwrap();
    assert_eq!(root, root2);
    assert_eq!(std::fs::read_to_string(root2.join("lib.h")).unwrap(), "fresh");
    // Invalidation is wholesale: nothing from the stale root survives.
    assert!(!root2.join("stale-only.h").exists());

    let marker = std::fs::read_to_string(root2.join(MARKER_FILE)).unwrap();
    assert!(marker.contains("version = \"1.0.0\""));
}

#[tokio::test]
async fn test_failed_fetch_leaves_no_partial_state() {
    let server = MockServer::start().await;
    serve(&server, "1.0.0", "good.h", "ok", 2).await;
    // bad.h always fails; three attempts consume this mock on the first
    // ensure, after which the success mock below takes over.
    Mock::given(method("GET"))
        .and(path("/1.0.0/bad.h"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/1.0.0/bad.h"))
        .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
        .mount(&server)
        .await;

    let cache = temp_cache();
    let fetcher = fast_fetcher(cache.path());
    let identity = Identity::new("demo", "1.0.0");
    let template = template_for(&server);
    let manifest = Manifest::from_paths(["good.h", "bad.h"]);

    let err = fetcher.ensure(&identity, &template, &manifest).unwrap_err();
    assert!(matches!(err, FetchError::Network { .. }));
    assert!(err.to_string().contains("bad.h"));

    let root = fetcher.cache_root(&identity);
    // The failed file never appears at its destination, no completion is
    // recorded, and no staging leftovers remain.
    assert!(!root.join("bad.h").exists());
    assert!(!root.join(MARKER_FILE).exists());
    let leftovers: Vec<_> = std::fs::read_dir(&root)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "staging files left behind: {:?}", leftovers);

    // The next run completes from scratch.
    let root = fetcher.ensure(&identity, &template, &manifest).unwrap();
    assert_eq!(
        std::fs::read_to_string(root.join("bad.h")).unwrap(),
        "recovered"
    );
    assert!(root.join(MARKER_FILE).exists());
}

#[tokio::test]
async fn test_transient_error_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.0.0/flaky.h"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    serve(&server, "1.0.0", "flaky.h", "eventually", 1).await;

    let cache = temp_cache();
    let fetcher = fast_fetcher(cache.path());
    let root = fetcher
        .ensure(
            &Identity::new("demo", "1.0.0"),
            &template_for(&server),
            &Manifest::from_paths(["flaky.h"]),
        )
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(root.join("flaky.h")).unwrap(),
        "eventually"
    );
    assert_eq!(hits_for(&server, "1.0.0", "flaky.h").await, 2);
}

#[tokio::test]
async fn test_not_found_fails_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.0.0/missing.h"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let cache = temp_cache();
    let fetcher = fast_fetcher(cache.path());
    let err = fetcher
        .ensure(
            &Identity::new("demo", "1.0.0"),
            &template_for(&server),
            &Manifest::from_paths(["missing.h"]),
        )
        .unwrap_err();

    assert!(matches!(err, FetchError::Network { .. }));
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_pinned_digest_accepts_matching_content() {
    let server = MockServer::start().await;
    serve(&server, "1.0.0", "pinned.h", "int x;\n", 1).await;

    let cache = temp_cache();
    let fetcher = fast_fetcher(cache.path());
    let root = fetcher
        .ensure(
            &Identity::new("demo", "1.0.0"),
            &template_for(&server),
            &Manifest::new(vec![ManifestEntry::with_sha256("pinned.h", INT_X_SHA256)]),
        )
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(root.join("pinned.h")).unwrap(),
        "int x;\n"
    );
}

#[tokio::test]
async fn test_pinned_digest_rejects_wrong_content() {
    let server = MockServer::start().await;
    serve(&server, "1.0.0", "pinned.h", "something else", 1).await;

    let cache = temp_cache();
    let fetcher = fast_fetcher(cache.path());
    let identity = Identity::new("demo", "1.0.0");
    let err = fetcher
        .ensure(
            &identity,
            &template_for(&server),
            &Manifest::new(vec![ManifestEntry::with_sha256("pinned.h", INT_X_SHA256)]),
        )
        .unwrap_err();

    assert!(matches!(err, FetchError::Network { .. }));
    assert!(err.to_string().contains("sha256 mismatch"));

    let root = fetcher.cache_root(&identity);
    assert!(!root.join("pinned.h").exists());
    assert!(!root.join(MARKER_FILE).exists());
}

#[tokio::test]
async fn test_tampered_cached_file_is_refetched() {
    let server = MockServer::start().await;
    serve(&server, "1.0.0", "pinned.h", "int x;\n", 2).await;

    let cache = temp_cache();
    let fetcher = fast_fetcher(cache.path());
    let identity = Identity::new("demo", "1.0.0");
    let template = template_for(&server);
    let manifest = Manifest::new(vec![ManifestEntry::with_sha256("pinned.h", INT_X_SHA256)]);

    let root = fetcher.ensure(&identity, &template, &manifest).unwrap();
    std::fs::write(root.join("pinned.h"), "tampered").unwrap();

    fetcher.ensure(&identity, &template, &manifest).unwrap();
    assert_eq!(
        std::fs::read_to_string(root.join("pinned.h")).unwrap(),
        "int x;\n"
    );
}

#[tokio::test]
async fn test_deleted_file_is_refetched_without_touching_others() {
    let server = MockServer::start().await;
    serve(&server, "1.0.0", "a.h", "AAA", 2).await;
    serve(&server, "1.0.0", "b.h", "BBB", 1).await;

    let cache = temp_cache();
    let fetcher = fast_fetcher(cache.path());
    let identity = Identity::new("demo", "1.0.0");
    let template = template_for(&server);
    let manifest = Manifest::from_paths(["a.h", "b.h"]);

    let root = fetcher.ensure(&identity, &template, &manifest).unwrap();
    std::fs::remove_file(root.join("a.h")).unwrap();

    fetcher.ensure(&identity, &template, &manifest).unwrap();
    assert_eq!(std::fs::read_to_string(root.join("a.h")).unwrap(), "AAA");
    assert_eq!(std::fs::read_to_string(root.join("b.h")).unwrap(), "BBB");
}
