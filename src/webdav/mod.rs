pub mod client;
pub mod dates;
pub mod multistatus;
pub mod request;
pub mod types;

pub use client::WebDavClient;
pub use dates::parse_webdav_date;
pub use multistatus::{parse_multistatus_bytes, parse_multistatus_reader};
pub use types::{Depth, PropertyUpdate, Resource};
