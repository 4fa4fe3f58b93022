use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// WebDAV Depth
#[derive(Copy, Clone)]
pub enum Depth {
    Zero,
    One,
    Infinity,
}
impl Depth {
    pub fn as_str(self) -> &'static str {
        match self {
            Depth::Zero => "0",
            Depth::One => "1",
            Depth::Infinity => "infinity",
        }
    }
}

/// One remote entity described by a multistatus `<response>` element.
///
/// `properties` holds every property the server reported, keyed by its
/// namespace-stripped local name. When several namespaces carry the same
/// local name, the value appearing last in document order wins. Well-known
/// DAV properties are additionally surfaced as typed fields; a value the
/// server sent in an unrecognized shape leaves the typed field `None` while
/// the raw string stays available in `properties`.
#[derive(Debug, Clone)]
pub struct Resource {
    /// Location of the entity exactly as the server spelled it.
    pub href: String,
    /// Flattened property map, last write wins per local name.
    pub properties: HashMap<String, String>,
    /// Parsed `creationdate`.
    pub creation_date: Option<DateTime<Utc>>,
    /// Parsed `getlastmodified`.
    pub modified_date: Option<DateTime<Utc>>,
    /// Raw `getcontenttype`.
    pub content_type: Option<String>,
    /// Parsed `getcontentlength`.
    pub content_length: Option<u64>,
    /// Raw `getetag`.
    pub etag: Option<String>,
    /// True when `resourcetype` contains a `<collection/>` marker.
    pub is_directory: bool,
}

impl Resource {
    pub fn new() -> Self {
        Self {
            href: String::new(),
            properties: HashMap::new(),
            creation_date: None,
            modified_date: None,
            content_type: None,
            content_length: None,
            etag: None,
            is_directory: false,
        }
    }
}

impl Default for Resource {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordered set of property writes and removals for one PROPPATCH request.
///
/// Entries are serialized in insertion order. Names and values are placed in
/// the body verbatim, so callers must supply XML-safe content.
#[derive(Debug, Clone, Default)]
pub struct PropertyUpdate {
    set: Vec<(String, String)>,
    remove: Vec<String>,
}

impl PropertyUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a property write.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set.push((name.into(), value.into()));
        self
    }

    /// Queue a property removal.
    pub fn remove(mut self, name: impl Into<String>) -> Self {
        self.remove.push(name.into());
        self
    }

    /// Properties to write, in insertion order.
    pub fn set_props(&self) -> &[(String, String)] {
        &self.set
    }

    /// Properties to remove, in insertion order.
    pub fn removed_props(&self) -> &[String] {
        &self.remove
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.remove.is_empty()
    }
}
