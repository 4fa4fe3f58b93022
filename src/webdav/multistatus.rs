use std::io::{BufRead, Cursor};

use quick_xml::Reader;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesRef, Event};
use tokio::io::AsyncBufRead;

use crate::error::{DavError, Result};
use crate::webdav::dates::parse_webdav_date;
use crate::webdav::types::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementName {
    Multistatus,
    Response,
    Propstat,
    Prop,
    Href,
    Other,
}

fn element_from_bytes(raw: &[u8]) -> ElementName {
    let local = match raw.iter().position(|b| *b == b':') {
        Some(idx) => &raw[idx + 1..],
        None => raw,
    };

    if local.eq_ignore_ascii_case(b"multistatus") {
        ElementName::Multistatus
    } else if local.eq_ignore_ascii_case(b"response") {
        ElementName::Response
    } else if local.eq_ignore_ascii_case(b"propstat") {
        ElementName::Propstat
    } else if local.eq_ignore_ascii_case(b"prop") {
        ElementName::Prop
    } else if local.eq_ignore_ascii_case(b"href") {
        ElementName::Href
    } else {
        ElementName::Other
    }
}

fn local_name(raw: &[u8]) -> String {
    let local = match raw.iter().position(|b| *b == b':') {
        Some(idx) => &raw[idx + 1..],
        None => raw,
    };
    String::from_utf8_lossy(local).into_owned()
}

/// Collects the subtree of one property element: its local name, concatenated
/// text, and whether a nested `<collection/>` marker was seen.
struct PropCapture {
    name: String,
    text: String,
    depth: usize,
    is_resourcetype: bool,
    has_collection: bool,
}

/// Event-driven multistatus reader.
///
/// Structural elements are tracked on an explicit stack; everything below a
/// `<prop>` is treated as an opaque property subtree and captured whole, so
/// vendor properties come through without the parser knowing them. Text
/// content arrives chunked around entity references, so href text accumulates
/// until its element closes.
struct MultistatusParser<'a> {
    url: &'a str,
    stack: Vec<ElementName>,
    resources: Vec<Resource>,
    current: Resource,
    capture: Option<PropCapture>,
    href_text: String,
    seen_root: bool,
}

impl<'a> MultistatusParser<'a> {
    fn new(url: &'a str) -> Self {
        Self {
            url,
            stack: Vec::with_capacity(16),
            resources: Vec::new(),
            current: Resource::default(),
            capture: None,
            href_text: String::new(),
            seen_root: false,
        }
    }

    fn path_ends_with(&self, needle: &[ElementName]) -> bool {
        self.stack.len() >= needle.len()
            && self.stack[self.stack.len() - needle.len()..] == needle[..]
    }

    fn on_start(&mut self, raw: &[u8]) -> Result<()> {
        if let Some(capture) = self.capture.as_mut() {
            capture.depth += 1;
            if capture.is_resourcetype && local_name(raw).eq_ignore_ascii_case("collection") {
                capture.has_collection = true;
            }
            self.stack.push(element_from_bytes(raw));
            return Ok(());
        }

        let element = element_from_bytes(raw);

        if self.stack.is_empty() {
            if element != ElementName::Multistatus {
                return Err(DavError::malformed(
                    self.url,
                    format!("unexpected root element <{}>", local_name(raw)),
                ));
            }
            self.seen_root = true;
        }

        if self.path_ends_with(&[ElementName::Response, ElementName::Propstat, ElementName::Prop])
        {
            let name = local_name(raw);
            self.capture = Some(PropCapture {
                is_resourcetype: name.eq_ignore_ascii_case("resourcetype"),
                name,
                text: String::new(),
                depth: 0,
                has_collection: false,
            });
            self.stack.push(element);
            return Ok(());
        }

        self.stack.push(element);
        if element == ElementName::Response {
            self.current = Resource::default();
            self.href_text.clear();
        }
        Ok(())
    }

    fn on_end(&mut self) -> Result<()> {
        match self.capture.take() {
            Some(mut capture) if capture.depth > 0 => {
                capture.depth -= 1;
                self.capture = Some(capture);
                self.stack.pop();
            }
            Some(capture) => {
                self.stack.pop();
                self.finish_property(capture);
            }
            None => match self.stack.pop() {
                Some(ElementName::Href) if self.path_ends_with(&[ElementName::Response]) => {
                    self.current.href = std::mem::take(&mut self.href_text).trim().to_string();
                }
                Some(ElementName::Response) => self.finish_response()?,
                _ => {}
            },
        }
        Ok(())
    }

    fn on_text(&mut self, text: &str) {
        if let Some(capture) = self.capture.as_mut() {
            capture.text.push_str(text);
            return;
        }

        if self.path_ends_with(&[ElementName::Response, ElementName::Href]) {
            self.href_text.push_str(text);
        }
    }

    /// Flatten the captured property into the record. The map takes every
    /// property with last write winning; recognized names also feed the typed
    /// fields, degrading to `None` when the value does not parse.
    fn finish_property(&mut self, capture: PropCapture) {
        let value = capture.text.trim().to_string();

        if capture.name.eq_ignore_ascii_case("creationdate") {
            self.current.creation_date = parse_webdav_date(&value);
        } else if capture.name.eq_ignore_ascii_case("getlastmodified") {
            self.current.modified_date = parse_webdav_date(&value);
        } else if capture.name.eq_ignore_ascii_case("getcontenttype") {
            self.current.content_type = Some(value.clone());
        } else if capture.name.eq_ignore_ascii_case("getcontentlength") {
            self.current.content_length = value.parse().ok();
        } else if capture.name.eq_ignore_ascii_case("getetag") {
            self.current.etag = Some(value.clone());
        } else if capture.name.eq_ignore_ascii_case("resourcetype") {
            self.current.is_directory = capture.has_collection;
        }

        self.current.properties.insert(capture.name, value);
    }

    fn finish_response(&mut self) -> Result<()> {
        let resource = std::mem::take(&mut self.current);
        if resource.href.is_empty() {
            return Err(DavError::malformed(
                self.url,
                "response element without an href",
            ));
        }
        self.resources.push(resource);
        Ok(())
    }

    fn finish(self) -> Result<Vec<Resource>> {
        if !self.seen_root {
            return Err(DavError::malformed(
                self.url,
                "body is not a multistatus document",
            ));
        }
        Ok(self.resources)
    }
}

fn decode_text(raw: &[u8], url: &str) -> Result<String> {
    match std::str::from_utf8(raw) {
        Ok(s) => Ok(unescape(s)
            .map_err(|err| DavError::malformed(url, format!("XML decode error: {err}")))?
            .into_owned()),
        Err(_) => Ok(String::from_utf8_lossy(raw).into_owned()),
    }
}

/// Resolve a general entity reference to its replacement text.
///
/// Character references and the predefined XML entities resolve; any other
/// named entity has no definition in a DTD-less multistatus body and is
/// rejected.
fn resolve_reference(reference: &BytesRef<'_>, url: &str) -> Result<String> {
    if let Some(ch) = reference
        .resolve_char_ref()
        .map_err(|err| DavError::malformed(url, format!("invalid character reference: {err}")))?
    {
        return Ok(ch.to_string());
    }

    let name = reference
        .decode()
        .map_err(|err| DavError::malformed(url, format!("XML decode error: {err}")))?;
    match resolve_predefined_entity(&name) {
        Some(resolved) => Ok(resolved.to_string()),
        None => Err(DavError::malformed(
            url,
            format!("unresolvable entity reference &{name};"),
        )),
    }
}

fn map_xml_error(err: quick_xml::Error, url: &str) -> DavError {
    match err {
        quick_xml::Error::Io(source) => DavError::Transport {
            url: url.to_string(),
            source: Box::new(source),
        },
        other => DavError::malformed(url, format!("XML parsing error: {other}")),
    }
}

/// Parse an aggregated multistatus body into resource records.
///
/// Records come back in document order, one per `<response>`. `url` names the
/// request target and is only used to annotate errors.
pub fn parse_multistatus_bytes(body: &[u8], url: &str) -> Result<Vec<Resource>> {
    parse_multistatus_read(Cursor::new(body), url)
}

fn parse_multistatus_read<R: BufRead>(reader: R, url: &str) -> Result<Vec<Resource>> {
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(false);

    let mut buf = Vec::with_capacity(8 * 1024);
    let mut parser = MultistatusParser::new(url);

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => parser.on_start(e.name().as_ref())?,
            Ok(Event::Empty(ref e)) => {
                parser.on_start(e.name().as_ref())?;
                parser.on_end()?;
            }
            Ok(Event::Text(ref e)) => {
                let text = decode_text(e.as_ref(), url)?;
                parser.on_text(&text);
            }
            Ok(Event::CData(ref e)) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                parser.on_text(&text);
            }
            Ok(Event::GeneralRef(ref e)) => {
                let text = resolve_reference(e, url)?;
                parser.on_text(&text);
            }
            Ok(Event::End(_)) => parser.on_end()?,
            Ok(Event::Eof) => break,
            Err(e) => return Err(map_xml_error(e, url)),
            _ => {}
        }
        buf.clear();
    }

    parser.finish()
}

/// Parse a multistatus body straight off a streaming reader.
///
/// Same semantics as [`parse_multistatus_bytes`] without buffering the whole
/// document first; an I/O failure while reading surfaces as a transport
/// error rather than a malformed document.
pub async fn parse_multistatus_reader<R>(reader: R, url: &str) -> Result<Vec<Resource>>
where
    R: AsyncBufRead + Unpin + Send,
{
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(false);

    let mut buf = Vec::with_capacity(8 * 1024);
    let mut parser = MultistatusParser::new(url);

    loop {
        match xml.read_event_into_async(&mut buf).await {
            Ok(Event::Start(ref e)) => parser.on_start(e.name().as_ref())?,
            Ok(Event::Empty(ref e)) => {
                parser.on_start(e.name().as_ref())?;
                parser.on_end()?;
            }
            Ok(Event::Text(ref e)) => {
                let text = decode_text(e.as_ref(), url)?;
                parser.on_text(&text);
            }
            Ok(Event::CData(ref e)) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                parser.on_text(&text);
            }
            Ok(Event::GeneralRef(ref e)) => {
                let text = resolve_reference(e, url)?;
                parser.on_text(&text);
            }
            Ok(Event::End(_)) => parser.on_end()?,
            Ok(Event::Eof) => break,
            Err(e) => return Err(map_xml_error(e, url)),
            _ => {}
        }
        buf.clear();
    }

    parser.finish()
}
