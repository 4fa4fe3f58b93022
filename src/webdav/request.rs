//! Builders for the WebDAV verbs.
//!
//! Each builder produces a complete [`DavRequest`] carrying every header and
//! body the verb needs, so transports can stay protocol-agnostic. Builders
//! that accept caller-supplied strings for header values are fallible; the
//! rest construct unconditionally.

use bytes::Bytes;
use hyper::{HeaderMap, Method, Uri, header};

use crate::common::http::DavRequest;
use crate::error::{DavError, Result};
use crate::webdav::types::{Depth, PropertyUpdate};

/// Fixed PROPFIND body asking for every property of the targets.
const ALLPROP_BODY: &str = "<?xml version=\"1.0\" encoding=\"utf-8\" ?>\n<propfind xmlns=\"DAV:\">\n   <allprop/>\n</propfind>";

/// RFC 4918 request for an exclusive write lock.
const LOCKINFO_BODY: &str = "<?xml version=\"1.0\" encoding=\"utf-8\" ?>\n<D:lockinfo xmlns:D=\"DAV:\">\n  <D:lockscope><D:exclusive/></D:lockscope>\n  <D:locktype><D:write/></D:locktype>\n</D:lockinfo>\n";

fn dav_method(name: &'static str) -> Method {
    Method::from_bytes(name.as_bytes()).expect("extension method names are valid tokens")
}

fn xml_content_type() -> header::HeaderValue {
    header::HeaderValue::from_static("application/xml; charset=utf-8")
}

/// Build a `PROPFIND` asking for all properties of `url` at the given depth.
pub fn propfind(url: Uri, depth: Depth) -> DavRequest {
    let mut headers = HeaderMap::new();
    headers.insert("Depth", header::HeaderValue::from_static(depth.as_str()));
    headers.insert(header::CONTENT_TYPE, xml_content_type());

    DavRequest {
        method: dav_method("PROPFIND"),
        url,
        headers,
        body: Some(Bytes::from_static(ALLPROP_BODY.as_bytes())),
    }
}

/// Build a `PROPPATCH` applying `update` to `url`.
pub fn proppatch(url: Uri, update: &PropertyUpdate) -> DavRequest {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, xml_content_type());

    DavRequest {
        method: dav_method("PROPPATCH"),
        url,
        headers,
        body: Some(Bytes::from(proppatch_body(update))),
    }
}

/// Serialize a property update into the `propertyupdate` wire document.
///
/// Properties travel in the vendor `S:` namespace with the `D:` prefix
/// reserved for DAV structure. The `<D:set>` and `<D:remove>` blocks appear
/// only when they have content, set before remove.
pub fn proppatch_body(update: &PropertyUpdate) -> String {
    let mut body = String::from("<?xml version=\"1.0\" encoding=\"utf-8\" ?>\n");
    body.push_str("<D:propertyupdate xmlns:D=\"DAV:\" xmlns:S=\"SAR:\">\n");

    if !update.set_props().is_empty() {
        body.push_str("<D:set>\n<D:prop>\n");
        for (name, value) in update.set_props() {
            body.push_str("<S:");
            body.push_str(name);
            body.push('>');
            body.push_str(value);
            body.push_str("</S:");
            body.push_str(name);
            body.push_str(">\n");
        }
        body.push_str("</D:prop>\n</D:set>\n");
    }

    if !update.removed_props().is_empty() {
        body.push_str("<D:remove>\n<D:prop>\n");
        for name in update.removed_props() {
            body.push_str("<S:");
            body.push_str(name);
            body.push_str("/>");
        }
        body.push_str("</D:prop>\n</D:remove>\n");
    }

    body.push_str("</D:propertyupdate>\n");
    body
}

/// Build a `MOVE` from `source` to `destination` with overwrite enabled.
pub fn r#move(source: Uri, destination: &Uri) -> Result<DavRequest> {
    let headers = copy_move_headers(&source, destination)?;
    Ok(DavRequest {
        method: dav_method("MOVE"),
        url: source,
        headers,
        body: None,
    })
}

/// Build a `COPY` from `source` to `destination` with overwrite enabled.
pub fn copy(source: Uri, destination: &Uri) -> Result<DavRequest> {
    let headers = copy_move_headers(&source, destination)?;
    Ok(DavRequest {
        method: dav_method("COPY"),
        url: source,
        headers,
        body: None,
    })
}

fn copy_move_headers(source: &Uri, destination: &Uri) -> Result<HeaderMap> {
    check_consistent_slashes(source, destination)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        "Destination",
        header::HeaderValue::from_str(&destination.to_string())?,
    );
    headers.insert("Overwrite", header::HeaderValue::from_static("T"));
    Ok(headers)
}

/// Both paths must agree on whether they denote a collection: a trailing
/// slash on one side only means the caller is about to turn a file into a
/// collection or vice versa.
fn check_consistent_slashes(source: &Uri, destination: &Uri) -> Result<()> {
    if source.path().ends_with('/') != destination.path().ends_with('/') {
        return Err(DavError::protocol(format!(
            "source and destination must both be collections or both be files: {source} vs {destination}"
        )));
    }
    Ok(())
}

/// Build a `MKCOL` creating the collection at `url`.
pub fn mkcol(url: Uri) -> DavRequest {
    DavRequest {
        method: dav_method("MKCOL"),
        url,
        headers: HeaderMap::new(),
        body: None,
    }
}

/// Build a `GET` for the content of `url`.
pub fn get(url: Uri) -> DavRequest {
    DavRequest {
        method: Method::GET,
        url,
        headers: HeaderMap::new(),
        body: None,
    }
}

/// Build a `HEAD` probing `url` without transferring content.
pub fn head(url: Uri) -> DavRequest {
    DavRequest {
        method: Method::HEAD,
        url,
        headers: HeaderMap::new(),
        body: None,
    }
}

/// Build a `PUT` storing `body` at `url`.
pub fn put(url: Uri, body: Bytes) -> DavRequest {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/octet-stream"),
    );

    DavRequest {
        method: Method::PUT,
        url,
        headers,
        body: Some(body),
    }
}

/// Build a `DELETE` removing `url`.
pub fn delete(url: Uri) -> DavRequest {
    DavRequest {
        method: Method::DELETE,
        url,
        headers: HeaderMap::new(),
        body: None,
    }
}

/// Build a `LOCK` taking an exclusive write lock on `url`.
///
/// `timeout_secs` maps to the `Timeout` header; `None` requests an infinite
/// lock and the server is free to shorten whatever is asked.
pub fn lock(url: Uri, timeout_secs: Option<u64>) -> Result<DavRequest> {
    let mut headers = HeaderMap::new();
    let timeout = match timeout_secs {
        Some(secs) => header::HeaderValue::from_str(&format!("Second-{secs}"))?,
        None => header::HeaderValue::from_static("Infinite"),
    };
    headers.insert("Timeout", timeout);
    headers.insert(header::CONTENT_TYPE, xml_content_type());

    Ok(DavRequest {
        method: dav_method("LOCK"),
        url,
        headers,
        body: Some(Bytes::from_static(LOCKINFO_BODY.as_bytes())),
    })
}

/// Build an `UNLOCK` releasing the lock identified by `token`.
///
/// The token is sent in the `Lock-Token` header using the Coded-URL form;
/// tokens already wrapped in angle brackets are passed through as-is.
pub fn unlock(url: Uri, token: &str) -> Result<DavRequest> {
    let coded = if token.starts_with('<') {
        token.to_string()
    } else {
        format!("<{token}>")
    };

    let mut headers = HeaderMap::new();
    headers.insert("Lock-Token", header::HeaderValue::from_str(&coded)?);

    Ok(DavRequest {
        method: dav_method("UNLOCK"),
        url,
        headers,
        body: None,
    })
}
