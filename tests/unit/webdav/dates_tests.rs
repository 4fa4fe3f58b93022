use chrono::{TimeZone, Timelike, Utc};
use dav_client_rs::parse_webdav_date;

#[test]
fn parses_iso8601_with_literal_z() {
    let parsed = parse_webdav_date("2024-01-15T10:30:00Z").expect("date parses");
    assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap());
}

#[test]
fn parses_rfc1123() {
    let parsed = parse_webdav_date("Mon, 15 Jan 2024 10:30:00 GMT").expect("date parses");
    assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap());
}

#[test]
fn parses_iso8601_with_fractional_seconds() {
    let parsed = parse_webdav_date("2024-01-15T10:30:00.500Z").expect("date parses");
    assert_eq!(parsed.nanosecond(), 500_000_000);
    assert_eq!(
        parsed.with_nanosecond(0).unwrap(),
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    );
}

#[test]
fn parses_iso8601_with_numeric_offset() {
    let parsed = parse_webdav_date("2024-01-15T10:30:00+0200").expect("date parses");
    assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap());

    let with_colon = parse_webdav_date("2024-01-15T10:30:00+02:00").expect("date parses");
    assert_eq!(with_colon, parsed);
}

#[test]
fn parses_asctime_with_zone() {
    let parsed = parse_webdav_date("Mon Jan 15 10:30:00 GMT 2024").expect("date parses");
    assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap());
}

#[test]
fn parses_rfc850_with_two_digit_year() {
    let parsed = parse_webdav_date("Monday, 15-Jan-24 10:30:00 GMT").expect("date parses");
    assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap());
}

#[test]
fn parses_asctime_with_full_month_name() {
    let parsed = parse_webdav_date("Fri January 5 10:30:00 2024").expect("date parses");
    assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 5, 10, 30, 0).unwrap());
}

#[test]
fn zoneless_formats_are_read_as_gmt() {
    // Same instant spelled with and without an explicit zone must agree.
    let naive = parse_webdav_date("2024-01-15T10:30:00Z").expect("date parses");
    let offset = parse_webdav_date("2024-01-15T12:30:00+0200").expect("date parses");
    assert_eq!(naive, offset);
}

#[test]
fn unknown_shapes_yield_none() {
    assert_eq!(parse_webdav_date("not-a-date"), None);
    assert_eq!(parse_webdav_date(""), None);
    assert_eq!(parse_webdav_date("   "), None);
    assert_eq!(parse_webdav_date("15/01/2024 10:30"), None);
}

#[test]
fn surrounding_whitespace_is_tolerated() {
    let parsed = parse_webdav_date("  2024-01-15T10:30:00Z\n").expect("date parses");
    assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap());
}
