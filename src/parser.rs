//! Event-loop driver: feeds quick-xml events into the [`FeedBuilder`].
//!
//! The loop is single-pass over the input bytes and stops at end of document
//! or at the first tokenizer error. An error never discards the feed built
//! so far — callers get the partial aggregate alongside the error.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::Reader;
use thiserror::Error;

use crate::builder::FeedBuilder;
use crate::model::Feed;

/// Errors produced by the parse itself.
///
/// Field-level problems (unparsable dates or `ttl`, missing attributes) are
/// deliberately *not* errors — a feed with one malformed field must not fail
/// the whole parse. Only a well-formedness violation from the XML tokenizer
/// surfaces here, and it is raised at most once per parse.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The XML tokenizer reported a well-formedness violation. Carries the
    /// underlying cause; the feed built before the failure is retained.
    #[error("malformed XML: {0}")]
    Malformed(#[from] quick_xml::Error),
}

/// Outcome of one parse: the feed plus an optional tokenizer error.
///
/// The feed is always present. When `error` is `Some`, the feed holds
/// whatever was built before the tokenizer failed — entries closed before
/// the malformed point are still there. Callers must not treat a present
/// error as "no data".
#[derive(Debug)]
pub struct FeedParse {
    pub feed: Feed,
    pub error: Option<ParseError>,
}

impl FeedParse {
    /// All-or-nothing view: discards the partial feed when the tokenizer
    /// failed.
    pub fn into_result(self) -> Result<Feed, ParseError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.feed),
        }
    }
}

/// Parses a complete RSS 2.0 or Atom document from raw bytes.
///
/// Dispatch is by element name only, qualified prefix included, so both
/// dialects flow through the same two-level state machine. Entities beyond
/// the five XML builtins are rejected by quick-xml (no expansion, no XXE),
/// which reaches the caller as [`ParseError::Malformed`].
///
/// Each call uses a fresh builder; parsing the same bytes twice yields
/// field-for-field identical feeds.
pub fn parse_feed(bytes: &[u8]) -> FeedParse {
    // Text trimming stays off: element text reaches the builder exactly as
    // tokenized, whitespace included.
    let mut reader = Reader::from_reader(bytes);
    let mut builder = FeedBuilder::new();
    let mut buf = Vec::new();

    let error = loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match element_name(&reader, e.name()) {
                Ok(name) => builder.start_element(&name, element_attributes(&reader, e)),
                Err(error) => break Some(error),
            },
            // A self-closing element is an open immediately followed by a
            // close — Atom's <link href="..."/> depends on this.
            Ok(Event::Empty(ref e)) => match element_name(&reader, e.name()) {
                Ok(name) => {
                    builder.start_element(&name, element_attributes(&reader, e));
                    builder.end_element(&name);
                }
                Err(error) => break Some(error),
            },
            Ok(Event::End(ref e)) => match element_name(&reader, e.name()) {
                Ok(name) => builder.end_element(&name),
                Err(error) => break Some(error),
            },
            Ok(Event::Text(ref e)) => match e.unescape() {
                Ok(text) => builder.text(&text),
                Err(error) => break Some(ParseError::Malformed(quick_xml::Error::from(error))),
            },
            Ok(Event::CData(ref e)) => match reader.decoder().decode(e.as_ref()) {
                Ok(text) => builder.text(&text),
                Err(error) => break Some(ParseError::Malformed(quick_xml::Error::from(error))),
            },
            Ok(Event::Eof) => break None,
            // Declarations, comments, processing instructions, doctypes.
            Ok(_) => {}
            Err(error) => break Some(ParseError::Malformed(error)),
        }
        buf.clear();
    };

    if let Some(ref error) = error {
        tracing::warn!(%error, "Feed parse halted");
    }

    FeedParse {
        feed: builder.finish(),
        error,
    }
}

fn element_name(reader: &Reader<&[u8]>, name: QName<'_>) -> Result<String, ParseError> {
    let decoded = reader
        .decoder()
        .decode(name.as_ref())
        .map_err(quick_xml::Error::from)?;
    Ok(decoded.into_owned())
}

/// Collects the full attribute set of an element. Individual malformed
/// attributes are skipped with a warning rather than failing the parse.
fn element_attributes(reader: &Reader<&[u8]>, e: &BytesStart<'_>) -> HashMap<String, String> {
    let decoder = reader.decoder();
    let mut attributes = HashMap::new();

    for attr_result in e.attributes() {
        let attr = match attr_result {
            Ok(attr) => attr,
            Err(error) => {
                tracing::warn!(%error, "Skipping malformed attribute");
                continue;
            }
        };
        let key = match decoder.decode(attr.key.as_ref()) {
            Ok(key) => key.into_owned(),
            Err(error) => {
                tracing::warn!(%error, "Skipping undecodable attribute name");
                continue;
            }
        };
        match attr.decode_and_unescape_value(decoder) {
            Ok(value) => {
                attributes.insert(key, value.into_owned());
            }
            Err(error) => {
                tracing::warn!(attribute = %key, %error, "Skipping undecodable attribute value");
            }
        }
    }

    attributes
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rss_concrete_scenario() {
        let xml = "<rss><channel><title>T</title><item><title>A</title>\
                   <pubDate>Mon, 02 Jan 2006 15:04:05 +0000</pubDate></item></channel></rss>";

        let parsed = parse_feed(xml.as_bytes());
        assert!(parsed.error.is_none());
        assert_eq!(parsed.feed.title.as_deref(), Some("T"));
        assert_eq!(parsed.feed.items.len(), 1);
        assert_eq!(parsed.feed.items[0].title.as_deref(), Some("A"));
        assert_eq!(
            parsed.feed.items[0].pub_date.unwrap().to_rfc3339(),
            "2006-01-02T15:04:05+00:00"
        );
    }

    #[test]
    fn test_atom_concrete_scenario() {
        let xml = r#"<feed><entry><id>123</id><link href="http://x"/></entry></feed>"#;

        let parsed = parse_feed(xml.as_bytes());
        assert!(parsed.error.is_none());
        assert_eq!(parsed.feed.items.len(), 1);
        assert_eq!(parsed.feed.items[0].guid.as_deref(), Some("123"));
        assert_eq!(parsed.feed.items[0].link.as_deref(), Some("http://x"));
    }

    #[test]
    fn test_malformed_trailing_xml_keeps_earlier_entries() {
        let xml = "<rss><channel>\
                   <item><guid>1</guid></item>\
                   <item><guid>2</guid></item>\
                   <item><guid>3</gui";

        let parsed = parse_feed(xml.as_bytes());
        assert!(parsed.error.is_some());
        // Entries closed before the malformed point survive.
        assert_eq!(parsed.feed.items.len(), 2);
        assert_eq!(parsed.feed.items[0].guid.as_deref(), Some("1"));
        assert_eq!(parsed.feed.items[1].guid.as_deref(), Some("2"));
    }

    #[test]
    fn test_mismatched_close_tag_is_malformed() {
        let parsed = parse_feed(b"<rss><channel><title>T</wrong></channel></rss>");
        assert!(matches!(parsed.error, Some(ParseError::Malformed(_))));
    }

    #[test]
    fn test_into_result_discards_partial_feed() {
        let ok = parse_feed(b"<rss><channel><title>T</title></channel></rss>");
        assert!(ok.into_result().is_ok());

        let bad = parse_feed(b"<rss><channel><title>T</wrong></channel></rss>");
        assert!(bad.into_result().is_err());
    }

    #[test]
    fn test_cdata_content_is_captured_raw() {
        let xml = "<rss><channel><item>\
                   <description><![CDATA[<b>bold</b> & raw]]></description>\
                   </item></channel></rss>";

        let parsed = parse_feed(xml.as_bytes());
        assert_eq!(
            parsed.feed.items[0].item_description.as_deref(),
            Some("<b>bold</b> & raw")
        );
    }

    #[test]
    fn test_entity_escapes_decoded_in_text() {
        let xml = "<rss><channel><title>Tom &amp; Jerry</title></channel></rss>";
        let parsed = parse_feed(xml.as_bytes());
        assert_eq!(parsed.feed.title.as_deref(), Some("Tom & Jerry"));
    }

    #[test]
    fn test_element_text_is_not_trimmed() {
        let xml = "<rss><channel><copyright>  spaced  </copyright></channel></rss>";
        let parsed = parse_feed(xml.as_bytes());
        assert_eq!(parsed.feed.copyright.as_deref(), Some("  spaced  "));
    }

    #[test]
    fn test_fresh_parses_are_identical() {
        let xml = br#"<rss><channel><title>T</title><ttl>30</ttl>
            <item><title>A</title><enclosure url="a.mp3" length="1"/></item>
            <item><title>B</title></item>
            </channel></rss>"#;

        let first = parse_feed(xml);
        let second = parse_feed(xml);
        assert_eq!(first.feed, second.feed);
    }

    #[test]
    fn test_unparsable_ttl_does_not_error() {
        let xml = "<rss><channel><ttl>abc</ttl><title>T</title></channel></rss>";
        let parsed = parse_feed(xml.as_bytes());
        assert!(parsed.error.is_none());
        assert_eq!(parsed.feed.ttl, None);
        assert_eq!(parsed.feed.title.as_deref(), Some("T"));
    }

    #[test]
    fn test_alias_equivalence_across_dialects() {
        let rss = "<rss><channel><item>\
                   <pubDate>Mon, 02 Jan 2006 15:04:05 +0000</pubDate>\
                   </item></channel></rss>";
        let atom = "<feed><entry>\
                    <updated>Mon, 02 Jan 2006 15:04:05 GMT</updated>\
                    </entry></feed>";

        let from_rss = parse_feed(rss.as_bytes());
        let from_atom = parse_feed(atom.as_bytes());
        assert_eq!(
            from_rss.feed.items[0].pub_date,
            from_atom.feed.items[0].pub_date
        );
    }

    #[test]
    fn test_custom_entities_are_not_expanded() {
        // quick-xml (0.37) never parses <!ENTITY> declarations; the
        // unresolved reference halts the parse instead of expanding.
        let xml = r#"<?xml version="1.0"?>
<!DOCTYPE rss [<!ENTITY xxe SYSTEM "file:///etc/passwd">]>
<rss><channel><title>&xxe;</title></channel></rss>"#;

        let parsed = parse_feed(xml.as_bytes());
        if let Some(title) = parsed.feed.title {
            assert!(!title.contains("root:"), "entity expansion detected");
        }
    }
}
