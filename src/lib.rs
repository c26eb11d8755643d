//! Streaming RSS 2.0 / Atom feed parsing.
//!
//! This crate turns a raw XML byte buffer into a typed [`Feed`] aggregate,
//! resolving the differences between the two dialects (RSS `item`/`link`/
//! `pubDate` vs Atom `entry`/`href`-attribute-link/`updated`/`published`)
//! as the events stream by — one pass, no whole-document tree.
//!
//! # Architecture
//!
//! - `model` - The [`Feed`]/[`Entry`] data model
//! - `builder` - The event-driven state machine that fills the model in
//! - `parser` - The quick-xml event loop and [`parse_feed`] entry point
//! - `dates` - Ordered fallback chains for the RFC 822 and ISO 8601
//!   date encodings feeds use in the wild
//! - `fetcher` - An optional reqwest adapter, [`fetch_feed`], for callers
//!   who want fetch-and-parse in one call
//!
//! # Example
//!
//! ```
//! use feedsift::parse_feed;
//!
//! let xml = br#"<rss><channel><title>T</title>
//!     <item><title>A</title></item>
//! </channel></rss>"#;
//!
//! let parsed = parse_feed(xml);
//! assert!(parsed.error.is_none());
//! assert_eq!(parsed.feed.title.as_deref(), Some("T"));
//! assert_eq!(parsed.feed.items.len(), 1);
//! ```
//!
//! Malformed XML does not discard work already done: the returned
//! [`FeedParse`] carries both the partially-built feed and the error, so a
//! feed that breaks halfway through still yields its earlier entries.

mod builder;
mod dates;
mod fetcher;
mod model;
mod parser;

pub use fetcher::{fetch_feed, FetchError};
pub use model::{Entry, Feed};
pub use parser::{parse_feed, FeedParse, ParseError};
