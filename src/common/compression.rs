//! Transparent handling of gzip-compressed response bodies.
//!
//! Requests advertise gzip support, and any response that arrives gzip-encoded
//! is rewrapped in a streaming decoder before protocol code sees it. Protocol
//! code therefore always reads identity bytes.

use async_compression::tokio::bufread::GzipDecoder;
use hyper::{HeaderMap, header, http};
use tokio::io::BufReader;

use crate::common::http::{BodyReader, DavResponse};

/// Check whether the response declares a gzip payload.
///
/// Tokens in `Content-Encoding` are matched case-insensitively, so `GZIP` and
/// `x, gzip` both count. Anything else (including absence) is treated as
/// identity.
pub fn is_gzip_encoded(headers: &HeaderMap) -> bool {
    let Some(val) = headers.get(header::CONTENT_ENCODING) else {
        return false;
    };

    let Ok(raw) = val.to_str() else {
        return false;
    };

    raw.split(',')
        .any(|token| token.trim().eq_ignore_ascii_case("gzip"))
}

/// Insert an `Accept-Encoding: gzip` header if not already present.
///
/// This hints to the server that the client supports compressed responses.
pub fn add_accept_encoding(h: &mut HeaderMap) {
    if !h.contains_key(header::ACCEPT_ENCODING) {
        h.insert(header::ACCEPT_ENCODING, http::HeaderValue::from_static("gzip"));
    }
}

/// Rewrap a gzip-encoded response so its body reads as identity bytes.
///
/// Responses without a gzip `Content-Encoding` pass through untouched. For
/// gzip responses the body is replaced by a streaming decoder and the now
/// stale `Content-Encoding` and `Content-Length` headers are dropped; status
/// and every other header are preserved.
pub fn normalize_response(response: DavResponse) -> DavResponse {
    if !is_gzip_encoded(&response.headers) {
        return response;
    }

    let DavResponse {
        status,
        mut headers,
        body,
    } = response;

    headers.remove(header::CONTENT_ENCODING);
    headers.remove(header::CONTENT_LENGTH);

    let decoded: BodyReader = Box::new(BufReader::new(GzipDecoder::new(body)));

    DavResponse {
        status,
        headers,
        body: decoded,
    }
}
