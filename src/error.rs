//! Error types shared by every operation in the crate.

use hyper::StatusCode;
use hyper::header::InvalidHeaderValue;
use hyper::http::uri::{InvalidUri, InvalidUriParts};
use thiserror::Error;

/// Convenience alias used by all fallible APIs in this crate.
pub type Result<T> = std::result::Result<T, DavError>;

/// Opaque failure produced by a [`Transport`](crate::common::http::Transport)
/// implementation. Kept boxed so transports built on different HTTP stacks can
/// surface their native error types unchanged.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Every way a WebDAV exchange can fail.
#[derive(Debug, Error)]
pub enum DavError {
    /// The request would break a protocol rule and was never sent. The caller
    /// can recover by correcting its input.
    #[error("protocol violation: {message}")]
    ProtocolViolation { message: String },

    /// The server answered, but the body is not a usable multistatus document.
    #[error("malformed multistatus response from {url}: {detail}")]
    MalformedResponse { url: String, detail: String },

    /// The server rejected the request with a status outside the 2xx range.
    #[error("request to {url} failed with status {status}")]
    RequestFailed { status: StatusCode, url: String },

    /// The exchange never completed: connection, TLS, timeout, or a failure
    /// while streaming the body.
    #[error("transport error for {url}")]
    Transport {
        url: String,
        #[source]
        source: TransportError,
    },
}

impl DavError {
    pub fn protocol(message: impl Into<String>) -> Self {
        DavError::ProtocolViolation {
            message: message.into(),
        }
    }

    pub fn malformed(url: impl Into<String>, detail: impl Into<String>) -> Self {
        DavError::MalformedResponse {
            url: url.into(),
            detail: detail.into(),
        }
    }
}

impl From<InvalidUri> for DavError {
    fn from(err: InvalidUri) -> Self {
        DavError::protocol(format!("invalid URL: {err}"))
    }
}

impl From<InvalidUriParts> for DavError {
    fn from(err: InvalidUriParts) -> Self {
        DavError::protocol(format!("invalid URL: {err}"))
    }
}

impl From<InvalidHeaderValue> for DavError {
    fn from(err: InvalidHeaderValue) -> Self {
        DavError::protocol(format!("invalid header value: {err}"))
    }
}
