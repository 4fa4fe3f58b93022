//! Parsing for the date serializations WebDAV servers actually emit.
//!
//! Servers in the wild answer with anything from strict ISO-8601 to ancient
//! asctime variants, so timestamp properties are matched against a fixed
//! fallback chain instead of a single grammar.

use chrono::{DateTime, NaiveDateTime, Utc};

/// How one entry in the fallback chain interprets its input.
enum DateFormat {
    /// RFC 1123 / RFC 2822, covering named zones such as `GMT`.
    Rfc2822,
    /// Format string carrying an explicit numeric offset (`%z`).
    WithOffset(&'static str),
    /// Format string without zone information; the result is read as GMT.
    Gmt(&'static str),
}

/// Known server date shapes, tried in order. First match wins, so more
/// specific shapes come before looser ones.
const SUPPORTED_DATE_FORMATS: &[DateFormat] = &[
    DateFormat::Gmt("%Y-%m-%dT%H:%M:%SZ"),
    DateFormat::Rfc2822,
    DateFormat::Gmt("%Y-%m-%dT%H:%M:%S%.fZ"),
    DateFormat::WithOffset("%Y-%m-%dT%H:%M:%S%z"),
    DateFormat::Gmt("%a %b %d %H:%M:%S GMT %Y"),
    DateFormat::Gmt("%A, %d-%b-%y %H:%M:%S GMT"),
    DateFormat::Gmt("%a %B %d %H:%M:%S %Y"),
];

/// Parse a timestamp from a WebDAV property value.
///
/// Runs the input through the supported format chain and returns the first
/// hit as UTC. Returns `None` when no format matches; callers keep the raw
/// string around, so nothing is lost when a server invents its own shape.
pub fn parse_webdav_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    SUPPORTED_DATE_FORMATS
        .iter()
        .find_map(|format| match format {
            DateFormat::Rfc2822 => DateTime::parse_from_rfc2822(raw)
                .ok()
                .map(|parsed| parsed.with_timezone(&Utc)),
            DateFormat::WithOffset(pattern) => DateTime::parse_from_str(raw, pattern)
                .ok()
                .map(|parsed| parsed.with_timezone(&Utc)),
            DateFormat::Gmt(pattern) => NaiveDateTime::parse_from_str(raw, pattern)
                .ok()
                .map(|parsed| parsed.and_utc()),
        })
}
