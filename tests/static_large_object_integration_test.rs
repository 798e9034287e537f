use openstack_client::{
    checksum, OpenStackClient, Segment, ServiceCatalog, ServiceType, TokenAuth,
};
use serde_json::json;
use std::collections::HashMap;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to create a test client against a mock object store
fn create_test_client(server_uri: &str) -> OpenStackClient {
    let catalog = ServiceCatalog::builder()
        .endpoint(
            ServiceType::ObjectStore,
            "DFW",
            format!("{}/v1/AUTH_test", server_uri),
        )
        .expect("valid endpoint")
        .default_region("DFW")
        .build();

    OpenStackClient::new(catalog, TokenAuth::new("test-token")).expect("Failed to create client")
}

fn segments() -> Vec<Segment> {
    vec![
        Segment::new("/videos/movie.mp4/part-1", "5d41402abc4b2a76b9719d911017c592", 1024),
        Segment::new("/videos/movie.mp4/part-2", "d41d8cd98f00b204e9800998ecf8427e", 512),
    ]
}

/// Publishing a manifest PUTs the ordered segment list and returns the
/// ETag the server reports
#[tokio::test]
async fn test_replace_manifest() {
    let _ = env_logger::try_init();

    let server = MockServer::start().await;
    let expected_etag = checksum::manifest_etag(&segments());

    Mock::given(method("PUT"))
        .and(path("/v1/AUTH_test/videos/movie.mp4"))
        .and(query_param("multipart-manifest", "put"))
        .and(header("X-Auth-Token", "test-token"))
        .and(header("X-Object-Meta-title", "movie"))
        .and(body_json(json!([
            {"path": "/videos/movie.mp4/part-1",
             "etag": "5d41402abc4b2a76b9719d911017c592",
             "size_bytes": 1024},
            {"path": "/videos/movie.mp4/part-2",
             "etag": "d41d8cd98f00b204e9800998ecf8427e",
             "size_bytes": 512}
        ])))
        .respond_with(
            ResponseTemplate::new(201).insert_header("ETag", format!("\"{}\"", expected_etag)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server.uri());
    let slo = client
        .static_large_objects(None, "videos")
        .expect("Failed to resolve region");

    let mut metadata = HashMap::new();
    metadata.insert("title".to_string(), "movie".to_string());

    let etag = slo
        .replace_manifest("movie.mp4", &segments(), &metadata)
        .await
        .expect("Failed to publish manifest");

    // The returned tag is the hash of the segments' hashes; comparing it
    // against the locally computed value verifies acceptance without
    // re-reading the assembled object.
    assert_eq!(etag, expected_etag, "Quotes are stripped from the header");
}

/// Re-publishing with identical segments is idempotent at the protocol
/// level: same request body, same resulting tag
#[tokio::test]
async fn test_replace_manifest_is_deterministic() {
    let _ = env_logger::try_init();

    let server = MockServer::start().await;
    let expected_etag = checksum::manifest_etag(&segments());

    Mock::given(method("PUT"))
        .and(path("/v1/AUTH_test/videos/movie.mp4"))
        .and(query_param("multipart-manifest", "put"))
        .respond_with(ResponseTemplate::new(201).insert_header("ETag", expected_etag.as_str()))
        .expect(2)
        .mount(&server)
        .await;

    let client = create_test_client(&server.uri());
    let slo = client
        .static_large_objects(None, "videos")
        .expect("Failed to resolve region");

    let first = slo
        .replace_manifest("movie.mp4", &segments(), &HashMap::new())
        .await
        .expect("First publish failed");
    let second = slo
        .replace_manifest("movie.mp4", &segments(), &HashMap::new())
        .await
        .expect("Second publish failed");

    assert_eq!(first, second);
    assert_eq!(first, checksum::manifest_etag(&segments()));
}

/// Deleting a manifest removes it and its segments
#[tokio::test]
async fn test_delete_manifest() {
    let _ = env_logger::try_init();

    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/AUTH_test/videos/movie.mp4"))
        .and(query_param("multipart-manifest", "delete"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server.uri());
    let slo = client
        .static_large_objects(None, "videos")
        .expect("Failed to resolve region");

    slo.delete("movie.mp4").await.expect("Delete failed");
}

/// Deleting an absent object succeeds; delete is idempotent
#[tokio::test]
async fn test_delete_absent_manifest_is_a_noop() {
    let _ = env_logger::try_init();

    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/AUTH_test/videos/never-uploaded.mp4"))
        .and(query_param("multipart-manifest", "delete"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "itemNotFound": {"message": "object not found"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server.uri());
    let slo = client
        .static_large_objects(None, "videos")
        .expect("Failed to resolve region");

    slo.delete("never-uploaded.mp4")
        .await
        .expect("Deleting an absent manifest must not fail");
}
