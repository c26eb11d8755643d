//! The feed builder: a push-based state machine over XML parse events.
//!
//! The builder tracks exactly one piece of nesting context — whether an
//! `<item>`/`<entry>` is currently open. That single flag is enough to route
//! every element this parser extracts, because RSS and Atom nest the fields
//! we care about exactly two levels deep (feed → item). Elements whose names
//! match nothing in either table are ignored, which keeps the parser
//! forward-compatible with extension elements.

use std::collections::HashMap;

use url::Url;

use crate::dates;
use crate::model::{Entry, Feed};

/// Accumulation state for one parse. A fresh builder is created per parse;
/// instances are never shared between parses.
#[derive(Debug, Default)]
pub(crate) struct FeedBuilder {
    feed: Feed,
    /// `Some` while an `<item>`/`<entry>` is open. Its presence *is* the
    /// entry-level state; there is no separate discriminant.
    entry: Option<Entry>,
    /// Character data accumulated since the last element open.
    buffer: String,
    /// Attributes of the most recently opened element. A single slot, not a
    /// stack: a nested element's attributes clobber visibility for a
    /// still-open outer element. This is documented contract; consumers may
    /// rely on it for malformed-nesting inputs.
    attributes: HashMap<String, String>,
}

impl FeedBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Element open: the text buffer resets, the visible attribute set is
    /// replaced wholesale, and an `item`/`entry` allocates the current entry.
    pub(crate) fn start_element(&mut self, name: &str, attributes: HashMap<String, String>) {
        self.buffer.clear();
        self.attributes = attributes;

        if name == "item" || name == "entry" {
            self.entry = Some(Entry::default());
        }
    }

    /// Character data may arrive in multiple chunks per element; chunks are
    /// concatenated in order with no separator and no trimming.
    pub(crate) fn text(&mut self, chunk: &str) {
        self.buffer.push_str(chunk);
    }

    /// Element close: dispatch by name alone. With an entry open the
    /// entry-level table applies, otherwise the feed-level table.
    pub(crate) fn end_element(&mut self, name: &str) {
        if self.entry.is_some() {
            self.assign_entry_field(name);
        } else {
            self.assign_feed_field(name);
        }
    }

    /// Hands the (possibly partial) feed to the caller.
    pub(crate) fn finish(self) -> Feed {
        self.feed
    }

    fn assign_entry_field(&mut self, name: &str) {
        if name == "item" || name == "entry" {
            if let Some(entry) = self.entry.take() {
                self.feed.items.push(entry);
            }
            self.attributes.clear();
            return;
        }

        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        match name {
            "title" => entry.title = Some(self.buffer.clone()),
            "description" | "summary" => entry.item_description = Some(self.buffer.clone()),
            "content:encoded" | "content" => entry.content = Some(self.buffer.clone()),
            // Atom puts the link in an href attribute, RSS in element text.
            // The fallback is specific to this field.
            "link" => {
                entry.link = Some(match self.attributes.get("href") {
                    Some(href) => href.clone(),
                    None => self.buffer.clone(),
                })
            }
            "guid" | "id" => entry.guid = Some(self.buffer.clone()),
            "author" => entry.author = Some(self.buffer.clone()),
            "comments" => entry.comments = Some(self.buffer.clone()),
            "source" => entry.source = Some(self.buffer.clone()),
            "pubDate" | "updated" => {
                if let Some(date) = dates::parse_chain(dates::RFC822, &self.buffer) {
                    entry.pub_date = Some(date);
                } else {
                    tracing::debug!(element = name, value = %self.buffer, "Unparsable entry date");
                }
            }
            "published" => {
                if let Some(date) = dates::parse_chain(dates::ISO8601, &self.buffer) {
                    entry.pub_date = Some(date);
                } else {
                    tracing::debug!(element = name, value = %self.buffer, "Unparsable entry date");
                }
            }
            "image" => {
                if let Some(url) = self.attributes.get("url") {
                    entry.image = Some(url.clone());
                }
            }
            "media:thumbnail" => {
                if let Some(url) = self.attributes.get("url") {
                    entry.media_thumbnail = Some(url.clone());
                }
            }
            "media:content" => {
                if let Some(url) = self.attributes.get("url") {
                    entry.media_content = Some(url.clone());
                }
            }
            "enclosure" => entry.enclosures.push(self.attributes.clone()),
            "category" => entry.categories.push(self.attributes.clone()),
            _ => {}
        }
    }

    fn assign_feed_field(&mut self, name: &str) {
        match name {
            "title" => self.feed.title = Some(self.buffer.clone()),
            "description" => self.feed.description = Some(self.buffer.clone()),
            "link" => self.feed.link = Some(self.buffer.clone()),
            "language" => self.feed.language = Some(self.buffer.clone()),
            "copyright" => self.feed.copyright = Some(self.buffer.clone()),
            "managingEditor" => self.feed.managing_editor = Some(self.buffer.clone()),
            "webMaster" => self.feed.web_master = Some(self.buffer.clone()),
            "generator" => self.feed.generator = Some(self.buffer.clone()),
            "docs" => self.feed.docs = Some(self.buffer.clone()),
            "ttl" => match self.buffer.parse::<u32>() {
                Ok(ttl) => self.feed.ttl = Some(ttl),
                Err(_) => {
                    tracing::debug!(value = %self.buffer, "Ignoring unparsable ttl");
                }
            },
            "pubDate" => {
                if let Some(date) = dates::parse_chain(dates::RFC822, &self.buffer) {
                    self.feed.pub_date = Some(date);
                } else {
                    tracing::debug!(element = name, value = %self.buffer, "Unparsable feed date");
                }
            }
            "published" => {
                if let Some(date) = dates::parse_chain(dates::ISO8601, &self.buffer) {
                    self.feed.pub_date = Some(date);
                } else {
                    tracing::debug!(element = name, value = %self.buffer, "Unparsable feed date");
                }
            }
            "lastBuildDate" => {
                if let Some(date) = dates::parse_chain(dates::RFC822, &self.buffer) {
                    self.feed.last_build_date = Some(date);
                } else {
                    tracing::debug!(element = name, value = %self.buffer, "Unparsable feed date");
                }
            }
            // A bare <url> at feed level. Real RSS 2.0 nests this inside
            // <image>, whose <title>/<link> children also land in the
            // feed-level fields above — last <url> text wins.
            "url" => match Url::parse(&self.buffer) {
                Ok(url) => self.feed.image = Some(url),
                Err(error) => {
                    tracing::debug!(value = %self.buffer, %error, "Ignoring unparsable feed image URL");
                }
            },
            _ => {}
        }
    }
}
