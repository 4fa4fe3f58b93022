use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose};
use bytes::Bytes;
use futures::future::BoxFuture;
use futures_util::TryStreamExt;
use http_body_util::{BodyStream, Full};
use hyper::{HeaderMap, Method, Request, StatusCode, Uri, header};
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use hyper_util::rt::TokioExecutor;
use tokio::io::{AsyncBufRead, AsyncReadExt, BufReader};
use tokio::time::{Duration, timeout};
use tokio_util::io::StreamReader;
use tracing::{trace, warn};

use crate::common::compression::add_accept_encoding;
use crate::error::{Result, TransportError};

/// Type alias for the Hyper client backing the default transport.
pub type HyperClient = Client<hyper_rustls::HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Streaming response body. Boxed so transports can hand back whatever reader
/// chain they produce (network stream, decompressor, in-memory buffer).
pub type BodyReader = Box<dyn AsyncBufRead + Send + Unpin>;

/// Build a Hyper client configured with HTTP/2, connection pooling, and a TLS connector
/// that prefers native roots but falls back to the bundled WebPKI store.
pub fn build_hyper_client() -> HyperClient {
    let https_builder = HttpsConnectorBuilder::new()
        .with_native_roots()
        .unwrap_or_else(|err| {
            warn!(error = %err, "native TLS roots unavailable, falling back to webpki roots");
            HttpsConnectorBuilder::new().with_webpki_roots()
        });

    let https = https_builder
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .build();

    Client::builder(TokioExecutor::new())
        .http2_adaptive_window(true)
        .pool_max_idle_per_host(128)
        .build::<_, Full<Bytes>>(https)
}

/// One fully prepared protocol request: verb, absolute URL, headers, and an
/// optional aggregated body. Verb-specific knowledge lives in the builders
/// that produce these values, not in the transport that sends them.
#[derive(Debug, Clone)]
pub struct DavRequest {
    pub method: Method,
    pub url: Uri,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

/// Raw outcome of one exchange: status, headers, and the body as a stream.
pub struct DavResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: BodyReader,
}

impl DavResponse {
    /// Wrap an already aggregated payload as a response body. Mostly useful
    /// for [`Transport`] implementations that do not stream.
    pub fn from_bytes(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body: Box::new(Cursor::new(body)),
        }
    }

    /// Read the remaining body to completion.
    pub async fn into_bytes(mut self) -> std::io::Result<Bytes> {
        let mut collected = Vec::with_capacity(32 * 1024);
        self.body.read_to_end(&mut collected).await?;
        Ok(Bytes::from(collected))
    }
}

/// Boundary between protocol logic and HTTP plumbing. The client only ever
/// talks to this trait, so tests and embedders can swap the network out.
pub trait Transport: Send + Sync {
    /// Execute one request and return the raw, unnormalized response.
    fn execute(
        &self,
        request: DavRequest,
    ) -> BoxFuture<'_, std::result::Result<DavResponse, TransportError>>;
}

/// Connection settings for the default [`HyperTransport`].
///
/// Anything beyond credentials, timeout, and user agent (proxies, custom TLS,
/// retry policies) belongs in a custom [`Transport`] implementation.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Username for preemptive Basic authentication.
    pub username: Option<String>,
    /// Password for preemptive Basic authentication.
    pub password: Option<String>,
    /// Time budget for connecting and receiving the response headers. Reading
    /// the response body is not bounded by it.
    pub timeout: Duration,
    /// Value sent in the `User-Agent` header.
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            timeout: Duration::from_secs(20),
            user_agent: concat!("dav-client-rs/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Default transport: hyper + rustls with HTTP/2 and connection pooling.
pub struct HyperTransport {
    client: HyperClient,
    auth_header: Option<header::HeaderValue>,
    user_agent: header::HeaderValue,
    timeout: Duration,
}

impl HyperTransport {
    pub fn new(options: ClientOptions) -> Result<Self> {
        let auth_header = match (&options.username, &options.password) {
            (Some(username), Some(password)) => {
                let token = format!("{username}:{password}");
                let encoded = general_purpose::STANDARD.encode(token.as_bytes());
                Some(header::HeaderValue::from_str(&format!("Basic {encoded}"))?)
            }
            _ => None,
        };

        Ok(Self {
            client: build_hyper_client(),
            auth_header,
            user_agent: header::HeaderValue::from_str(&options.user_agent)?,
            timeout: options.timeout,
        })
    }
}

impl Transport for HyperTransport {
    fn execute(
        &self,
        request: DavRequest,
    ) -> BoxFuture<'_, std::result::Result<DavResponse, TransportError>> {
        Box::pin(async move {
            let DavRequest {
                method,
                url,
                mut headers,
                body,
            } = request;

            add_accept_encoding(&mut headers);

            let mut builder = Request::builder().method(method.clone()).uri(url.clone());
            if let Some(auth) = &self.auth_header {
                builder = builder.header(header::AUTHORIZATION, auth);
            }
            builder = builder.header(header::USER_AGENT, &self.user_agent);
            for (name, value) in headers.iter() {
                builder = builder.header(name, value);
            }
            let request = builder.body(Full::new(body.unwrap_or_default()))?;

            trace!(method = %method, url = %url, "executing request");
            let response = timeout(self.timeout, self.client.request(request))
                .await
                .map_err(|_| {
                    std::io::Error::new(std::io::ErrorKind::TimedOut, "request timed out")
                })??;

            let (parts, body) = response.into_parts();
            let stream = BodyStream::new(body)
                .map_ok(|frame| frame.into_data().unwrap_or_default())
                .map_err(std::io::Error::other);
            let reader: BodyReader = Box::new(BufReader::new(StreamReader::new(stream)));

            Ok(DavResponse {
                status: parts.status,
                headers: parts.headers,
                body: reader,
            })
        })
    }
}
