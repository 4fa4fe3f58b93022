use bytes::Bytes;
use hyper::StatusCode;
use hyper::header::{ACCEPT_ENCODING, CONTENT_ENCODING, CONTENT_LENGTH, HeaderMap, HeaderValue};
use tokio::io::AsyncReadExt;

use dav_client_rs::{DavResponse, add_accept_encoding, is_gzip_encoded, normalize_response};

fn headers_with_encoding(value: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_ENCODING, HeaderValue::from_static(value));
    headers
}

async fn gzip(data: &[u8]) -> Bytes {
    let mut encoder = async_compression::tokio::bufread::GzipEncoder::new(data);
    let mut compressed = Vec::new();
    encoder
        .read_to_end(&mut compressed)
        .await
        .expect("gzip encoding in-memory data");
    Bytes::from(compressed)
}

#[test]
fn gzip_detection_is_case_insensitive_and_token_aware() {
    assert!(is_gzip_encoded(&headers_with_encoding("gzip")));
    assert!(is_gzip_encoded(&headers_with_encoding("GZIP")));
    assert!(is_gzip_encoded(&headers_with_encoding("br, gzip")));
    assert!(is_gzip_encoded(&headers_with_encoding(" gzip ")));

    assert!(!is_gzip_encoded(&headers_with_encoding("identity")));
    assert!(!is_gzip_encoded(&headers_with_encoding("gzippy")));
    assert!(!is_gzip_encoded(&HeaderMap::new()));
}

#[test]
fn accept_encoding_is_inserted_only_when_absent() {
    let mut headers = HeaderMap::new();
    add_accept_encoding(&mut headers);
    assert_eq!(headers.get(ACCEPT_ENCODING).unwrap(), "gzip");

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));
    add_accept_encoding(&mut headers);
    assert_eq!(headers.get(ACCEPT_ENCODING).unwrap(), "identity");
}

#[tokio::test]
async fn normalize_unwraps_gzip_and_drops_stale_headers() {
    let compressed = gzip(b"multistatus body").await;

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_ENCODING, HeaderValue::from_static("gzip"));
    headers.insert(CONTENT_LENGTH, HeaderValue::from(compressed.len()));
    headers.insert("DAV", HeaderValue::from_static("1, 2"));

    let response = DavResponse::from_bytes(StatusCode::OK, headers, compressed);
    let normalized = normalize_response(response);

    assert_eq!(normalized.status, StatusCode::OK);
    assert!(normalized.headers.get(CONTENT_ENCODING).is_none());
    assert!(normalized.headers.get(CONTENT_LENGTH).is_none());
    assert_eq!(normalized.headers.get("DAV").unwrap(), "1, 2");

    let body = normalized.into_bytes().await.expect("streaming decode");
    assert_eq!(body, Bytes::from_static(b"multistatus body"));
}

#[tokio::test]
async fn identity_responses_pass_through_untouched() {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_LENGTH, HeaderValue::from(5usize));

    let response = DavResponse::from_bytes(StatusCode::OK, headers, Bytes::from_static(b"plain"));
    let normalized = normalize_response(response);

    assert_eq!(normalized.headers.get(CONTENT_LENGTH).unwrap(), "5");
    let body = normalized.into_bytes().await.expect("read succeeds");
    assert_eq!(body, Bytes::from_static(b"plain"));
}
