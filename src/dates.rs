//! Date parsing fallback chains for the two encodings feeds use in the wild.
//!
//! A chain is an ordered list of parse attempts; the first one that succeeds
//! wins, and total failure is reported as `None` so the caller can leave the
//! target field untouched. New formats are appended to a chain without
//! altering the semantics of the existing ones.

use chrono::{DateTime, Utc};

/// One attempt in a fallback chain.
type DateParser = fn(&str) -> Option<DateTime<Utc>>;

/// RFC 822 chain, used for `pubDate`, `updated`, and `lastBuildDate`:
/// numeric UTC offset first, then the obsolete named zones (GMT, EST, ...).
pub(crate) const RFC822: &[DateParser] = &[rfc822_numeric_offset, rfc822_zone_name];

/// ISO 8601 chain, used for `published`: numeric UTC offset first, then the
/// `Z` zone designator (which also admits fractional seconds).
pub(crate) const ISO8601: &[DateParser] = &[iso8601_numeric_offset, iso8601_zone_designator];

/// Runs `raw` through a chain in order. Parsing is locale-invariant: chrono
/// only ever matches English month and weekday tokens, regardless of the
/// runtime's locale.
pub(crate) fn parse_chain(chain: &[DateParser], raw: &str) -> Option<DateTime<Utc>> {
    chain.iter().find_map(|parse| parse(raw))
}

fn rfc822_numeric_offset(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(raw, "%a, %d %b %Y %H:%M:%S %z")
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn rfc822_zone_name(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn iso8601_numeric_offset(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z")
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn iso8601_zone_designator(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_rfc822_numeric_offset() {
        let parsed = parse_chain(RFC822, "Mon, 02 Jan 2006 15:04:05 +0000");
        assert_eq!(parsed, Some(instant(2006, 1, 2, 15, 4, 5)));
    }

    #[test]
    fn test_rfc822_non_utc_offset_normalizes() {
        let parsed = parse_chain(RFC822, "Mon, 02 Jan 2006 15:04:05 +0200");
        assert_eq!(parsed, Some(instant(2006, 1, 2, 13, 4, 5)));
    }

    #[test]
    fn test_rfc822_named_zone_falls_through() {
        // The first pattern rejects named zones; the second accepts them.
        let parsed = parse_chain(RFC822, "Mon, 02 Jan 2006 15:04:05 GMT");
        assert_eq!(parsed, Some(instant(2006, 1, 2, 15, 4, 5)));
    }

    #[test]
    fn test_iso8601_numeric_offset() {
        let parsed = parse_chain(ISO8601, "2006-01-02T15:04:05+0000");
        assert_eq!(parsed, Some(instant(2006, 1, 2, 15, 4, 5)));
    }

    #[test]
    fn test_iso8601_zulu_falls_through() {
        let parsed = parse_chain(ISO8601, "2006-01-02T15:04:05Z");
        assert_eq!(parsed, Some(instant(2006, 1, 2, 15, 4, 5)));
    }

    #[test]
    fn test_chains_reject_each_others_shape() {
        assert_eq!(parse_chain(ISO8601, "Mon, 02 Jan 2006 15:04:05 +0000"), None);
        assert_eq!(parse_chain(RFC822, "2006-01-02T15:04:05Z"), None);
    }

    #[test]
    fn test_garbage_fails_whole_chain() {
        assert_eq!(parse_chain(RFC822, "next Tuesday"), None);
        assert_eq!(parse_chain(ISO8601, ""), None);
    }
}
