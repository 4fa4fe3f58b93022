//! WebDAV client library for Rust.
//!
//! This library provides an asynchronous WebDAV client built on modern Rust
//! ecosystem components including hyper 1.x, rustls, and tokio.
//!
//! # Features
//!
//! - Full verb coverage: PROPFIND, PROPPATCH, MKCOL, MOVE, COPY, LOCK/UNLOCK,
//!   plus plain GET/HEAD/PUT/DELETE
//! - Streaming multistatus parsing that keeps every property a server sends,
//!   including vendor extensions in foreign namespaces
//! - Tolerant timestamp handling covering the date formats real servers emit
//! - Transparent gzip response decompression
//! - Pluggable [`Transport`] so tests and embedders can bypass the network
//!
//! # Examples
//!
//! ## Listing a collection
//!
//! ```no_run
//! use dav_client_rs::{ClientOptions, Depth, WebDavClient};
//!
//! #[tokio::main]
//! async fn main() -> dav_client_rs::Result<()> {
//!     let client = WebDavClient::new(
//!         "https://dav.example.com/files/",
//!         ClientOptions {
//!             username: Some("user".into()),
//!             password: Some("secret".into()),
//!             ..ClientOptions::default()
//!         },
//!     )?;
//!
//!     for resource in client.list("projects/", Depth::One).await? {
//!         println!("{} (directory: {})", resource.href, resource.is_directory);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Updating properties
//!
//! ```no_run
//! use dav_client_rs::{ClientOptions, PropertyUpdate, WebDavClient};
//!
//! #[tokio::main]
//! async fn main() -> dav_client_rs::Result<()> {
//!     let client =
//!         WebDavClient::new("https://dav.example.com/files/", ClientOptions::default())?;
//!
//!     let update = PropertyUpdate::new()
//!         .set("color", "red")
//!         .remove("obsolete-tag");
//!     client.proppatch("report.pdf", &update).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod common;
pub mod error;
pub mod webdav;

pub use common::compression::{add_accept_encoding, is_gzip_encoded, normalize_response};
pub use common::http::{
    BodyReader, ClientOptions, DavRequest, DavResponse, HyperClient, HyperTransport, Transport,
    build_hyper_client,
};
pub use error::{DavError, Result, TransportError};
pub use webdav::client::WebDavClient;
pub use webdav::dates::parse_webdav_date;
pub use webdav::multistatus::{parse_multistatus_bytes, parse_multistatus_reader};
pub use webdav::types::{Depth, PropertyUpdate, Resource};
