use std::sync::Arc;

use bytes::Bytes;
use hyper::{StatusCode, Uri};
use tracing::{debug, warn};

use crate::common::compression::normalize_response;
use crate::common::http::{ClientOptions, DavRequest, DavResponse, HyperTransport, Transport};
use crate::error::{DavError, Result};
use crate::webdav::multistatus::parse_multistatus_reader;
use crate::webdav::request;
use crate::webdav::types::{Depth, PropertyUpdate, Resource};

/// High-level WebDAV client: one method per protocol operation, all going
/// through a single [`Transport`] so the network layer stays swappable.
///
/// Paths passed to operations are resolved against the base URL; absolute
/// `http(s)://` URLs are used as given.
#[derive(Clone)]
pub struct WebDavClient {
    base: Uri,
    transport: Arc<dyn Transport>,
}

impl WebDavClient {
    /// Create a client talking to `base_url` over the default hyper + rustls
    /// transport.
    pub fn new(base_url: &str, options: ClientOptions) -> Result<Self> {
        let transport = HyperTransport::new(options)?;
        Self::with_transport(base_url, Arc::new(transport))
    }

    /// Create a client on top of a caller-provided transport.
    pub fn with_transport(base_url: &str, transport: Arc<dyn Transport>) -> Result<Self> {
        let base: Uri = base_url.parse()?;
        Ok(Self { base, transport })
    }

    pub fn build_uri(&self, path: &str) -> Result<Uri> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(path.parse()?);
        }

        let mut parts = self.base.clone().into_parts();
        let existing_path = parts
            .path_and_query
            .as_ref()
            .map(|pq| pq.path())
            .unwrap_or("/");

        let (path_only, query) = if let Some((p, q)) = path.split_once('?') {
            (p, Some(q))
        } else {
            (path, None)
        };

        let mut combined = if path_only.is_empty() {
            existing_path.to_string()
        } else if path_only.starts_with('/') {
            path_only.to_string()
        } else {
            let mut base = existing_path.trim_end_matches('/').to_string();
            if base.is_empty() {
                base.push('/');
            }
            if !base.ends_with('/') {
                base.push('/');
            }
            base.push_str(path_only);
            base
        };

        if combined.is_empty() {
            combined.push('/');
        }

        let path_and_query = if let Some(q) = query {
            format!("{}?{}", combined, q).parse()?
        } else {
            combined.parse()?
        };

        parts.path_and_query = Some(path_and_query);
        Ok(Uri::from_parts(parts)?)
    }

    // ----------- WebDAV operations -----------

    /// List `path` and its members via `PROPFIND`, asking for all properties.
    ///
    /// Depth controls how much of the tree the server reports: the entity
    /// itself, its direct members, or everything below it. Records come back
    /// in document order.
    pub async fn list(&self, path: &str, depth: Depth) -> Result<Vec<Resource>> {
        let url = self.build_uri(path)?;
        let response = self.execute(request::propfind(url.clone(), depth)).await?;
        self.check_status(response.status, &url)?;
        parse_multistatus_reader(response.body, &url.to_string()).await
    }

    /// Apply property writes and removals to `path` via `PROPPATCH`.
    pub async fn proppatch(&self, path: &str, update: &PropertyUpdate) -> Result<()> {
        let url = self.build_uri(path)?;
        let response = self.execute(request::proppatch(url.clone(), update)).await?;
        self.check_status(response.status, &url)
    }

    /// Move the entity at `source` to `destination`, overwriting any existing
    /// target. Both arguments are resolved against the base URL.
    pub async fn r#move(&self, source: &str, destination: &str) -> Result<()> {
        let src = self.build_uri(source)?;
        let dest = self.build_uri(destination)?;
        let response = self.execute(request::r#move(src.clone(), &dest)?).await?;
        self.check_status(response.status, &src)
    }

    /// Copy the entity at `source` to `destination`, overwriting any existing
    /// target.
    pub async fn copy(&self, source: &str, destination: &str) -> Result<()> {
        let src = self.build_uri(source)?;
        let dest = self.build_uri(destination)?;
        let response = self.execute(request::copy(src.clone(), &dest)?).await?;
        self.check_status(response.status, &src)
    }

    /// Delete the entity at `path`.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let url = self.build_uri(path)?;
        let response = self.execute(request::delete(url.clone())).await?;
        self.check_status(response.status, &url)
    }

    /// Create the collection at `path` via `MKCOL`.
    pub async fn mkcol(&self, path: &str) -> Result<()> {
        let url = self.build_uri(path)?;
        let response = self.execute(request::mkcol(url.clone())).await?;
        self.check_status(response.status, &url)
    }

    /// Store `body` at `path` via `PUT`.
    pub async fn put(&self, path: &str, body: Bytes) -> Result<()> {
        let url = self.build_uri(path)?;
        let response = self.execute(request::put(url.clone(), body)).await?;
        self.check_status(response.status, &url)
    }

    /// Fetch the content of `path`, fully aggregated and decompressed.
    pub async fn get(&self, path: &str) -> Result<Bytes> {
        let url = self.build_uri(path)?;
        let response = self.execute(request::get(url.clone())).await?;
        self.check_status(response.status, &url)?;
        response
            .into_bytes()
            .await
            .map_err(|source| DavError::Transport {
                url: url.to_string(),
                source: Box::new(source),
            })
    }

    /// Check whether `path` exists with a `HEAD` request.
    ///
    /// `404` and `410` mean a clean "not there"; any other non-success status
    /// is a real failure and surfaces as an error.
    pub async fn exists(&self, path: &str) -> Result<bool> {
        let url = self.build_uri(path)?;
        let response = self.execute(request::head(url.clone())).await?;
        match response.status {
            StatusCode::NOT_FOUND | StatusCode::GONE => Ok(false),
            status if status.is_success() => Ok(true),
            status => {
                warn!(url = %url, status = %status, "server rejected request");
                Err(DavError::RequestFailed {
                    status,
                    url: url.to_string(),
                })
            }
        }
    }

    /// Take an exclusive write lock on `path` and return the lock token.
    ///
    /// The token comes back exactly as the server sent it in `Lock-Token`
    /// (Coded-URL form included) and can be passed straight to [`unlock`].
    ///
    /// [`unlock`]: WebDavClient::unlock
    pub async fn lock(&self, path: &str) -> Result<String> {
        let url = self.build_uri(path)?;
        let response = self.execute(request::lock(url.clone(), None)?).await?;
        self.check_status(response.status, &url)?;

        response
            .headers
            .get("Lock-Token")
            .and_then(|value| value.to_str().ok())
            .map(|token| token.to_string())
            .ok_or_else(|| {
                DavError::malformed(
                    url.to_string(),
                    "successful LOCK response missing a Lock-Token header",
                )
            })
    }

    /// Release the lock identified by `token` on `path`.
    pub async fn unlock(&self, path: &str, token: &str) -> Result<()> {
        let url = self.build_uri(path)?;
        let response = self.execute(request::unlock(url.clone(), token)?).await?;
        self.check_status(response.status, &url)
    }

    /// Escape hatch: execute a prebuilt request and hand back the normalized
    /// response without interpreting the status code.
    pub async fn send(&self, request: DavRequest) -> Result<DavResponse> {
        self.execute(request).await
    }

    async fn execute(&self, request: DavRequest) -> Result<DavResponse> {
        let method = request.method.clone();
        let url = request.url.to_string();

        let response = self
            .transport
            .execute(request)
            .await
            .map_err(|source| DavError::Transport {
                url: url.clone(),
                source,
            })?;

        debug!(method = %method, url = %url, status = %response.status, "request completed");
        Ok(normalize_response(response))
    }

    fn check_status(&self, status: StatusCode, url: &Uri) -> Result<()> {
        if status.is_success() {
            return Ok(());
        }

        warn!(url = %url, status = %status, "server rejected request");
        Err(DavError::RequestFailed {
            status,
            url: url.to_string(),
        })
    }
}
