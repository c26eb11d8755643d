use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// A parsed RSS 2.0 or Atom document: channel/feed metadata plus entries.
///
/// Every field is optional because both dialects treat nearly everything as
/// optional in practice. Repeated elements are last-write-wins except for
/// [`items`](Feed::items), which preserves document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    /// Channel/feed title.
    pub title: Option<String>,
    /// Channel description (RSS only; Atom has no direct equivalent here).
    pub description: Option<String>,
    /// Channel link, taken from element text.
    pub link: Option<String>,
    /// Language code, e.g. "en-us".
    pub language: Option<String>,
    pub copyright: Option<String>,
    /// RSS `managingEditor`.
    pub managing_editor: Option<String>,
    /// RSS `webMaster`.
    pub web_master: Option<String>,
    pub generator: Option<String>,
    pub docs: Option<String>,
    /// Cache lifetime in minutes. Unset when the element text is not an
    /// integer — malformed values are dropped, not errored.
    pub ttl: Option<u32>,
    /// Publication instant via the RFC 822 date chain (`pubDate`) or the
    /// ISO 8601 chain (`published`).
    pub pub_date: Option<DateTime<Utc>>,
    /// RSS `lastBuildDate` via the RFC 822 date chain.
    pub last_build_date: Option<DateTime<Utc>>,
    /// Feed image, taken from the text of a bare `<url>` element at feed
    /// level. In real RSS 2.0 that element sits inside `<image>`, whose
    /// `<title>`/`<link>` children also hit the feed-level fields of the
    /// same name — see the dispatch notes on [`parse_feed`](crate::parse_feed).
    pub image: Option<Url>,
    /// Entries in document order of their closing tags. Append-only: no
    /// reordering, no deduplication.
    pub items: Vec<Entry>,
}

/// One item (RSS) or entry (Atom) within a feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub title: Option<String>,
    /// RSS `description` / Atom `summary`.
    pub item_description: Option<String>,
    /// RSS `content:encoded` / Atom `content`.
    pub content: Option<String>,
    /// Atom `href` attribute when present, otherwise element text (RSS).
    pub link: Option<String>,
    /// RSS `guid` / Atom `id`.
    pub guid: Option<String>,
    pub author: Option<String>,
    pub comments: Option<String>,
    pub source: Option<String>,
    /// `url` attribute of an `<image>` element; never sourced from text.
    pub image: Option<String>,
    /// `url` attribute of `<media:thumbnail>`.
    pub media_thumbnail: Option<String>,
    /// `url` attribute of `<media:content>`.
    pub media_content: Option<String>,
    /// RSS `pubDate` / Atom `updated` (RFC 822 chain) or Atom `published`
    /// (ISO 8601 chain). When several of these occur in one entry, the last
    /// one in document order wins.
    pub pub_date: Option<DateTime<Utc>>,
    /// Full attribute set of each `<enclosure>`, in document order.
    pub enclosures: Vec<HashMap<String, String>>,
    /// Full attribute set of each `<category>`, in document order.
    pub categories: Vec<HashMap<String, String>>,
}
