use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::domain::feed::ChannelMetadata;
use crate::errors::{StripError, StripResult};

/// One `<item>` element as a flat tag → text mapping.
///
/// Keys are the qualified tag names exactly as they appear in the document
/// (`feedburner:origLink` stays namespaced). Duplicate tags overwrite, last
/// occurrence wins. Empty elements are stored as `None`, never as `""`.
#[derive(Debug, Clone, Default)]
pub struct RawItem {
    fields: HashMap<String, Option<String>>,
}

impl RawItem {
    pub fn insert(&mut self, tag: String, content: Option<String>) {
        self.fields.insert(tag, content);
    }

    /// Text content of a tag; absent and empty tags both come back as `None`.
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.fields.get(tag).and_then(|v| v.as_deref())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.fields.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Raw parse output: allow-listed channel metadata plus one mapping per
/// `<item>`, in document order.
#[derive(Debug, Clone)]
pub struct RawFeed {
    pub channel: ChannelMetadata,
    pub items: Vec<RawItem>,
}

/// Parse raw feed bytes. Non-UTF-8 sequences are replaced rather than
/// rejected; some of the older comic servers lie about their encoding.
pub fn parse(content: &[u8]) -> StripResult<RawFeed> {
    parse_str(&String::from_utf8_lossy(content))
}

/// Streaming parse of an RSS/XML document.
///
/// Mirrors a SAX accumulator: a character buffer opens when an element
/// starts inside an `<item>` (or an allow-listed element starts at channel
/// level) and its contents are stored when the matching close tag arrives.
/// State never survives past one call. Malformed XML fails the whole parse;
/// there is no recovery or partial result.
pub fn parse_str(content: &str) -> StripResult<RawFeed> {
    let mut reader = Reader::from_str(content);

    let mut channel = ChannelMetadata::default();
    let mut items: Vec<RawItem> = Vec::new();

    let mut current_item: Option<RawItem> = None;
    let mut buffer: Option<String> = None;
    let mut in_channel_tag = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();

                if name == "item" {
                    current_item = Some(RawItem::default());
                }

                if current_item.is_none() {
                    // Above item level only the allow-listed tags are kept
                    if ChannelMetadata::is_channel_tag(&name) {
                        buffer = Some(String::new());
                        in_channel_tag = true;
                    }
                } else {
                    buffer = Some(String::new());
                }
            }
            Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();

                if name == "item" {
                    items.push(RawItem::default());
                } else if let Some(item) = current_item.as_mut() {
                    item.insert(name, None);
                } else if ChannelMetadata::is_channel_tag(&name) {
                    channel.set(&name, None);
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(buf) = buffer.as_mut() {
                    let text = e.unescape().map_err(|e| StripError::Parse(e.to_string()))?;
                    buf.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(buf) = buffer.as_mut() {
                    buf.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();

                if let Some(content) = buffer.take() {
                    let content = if content.is_empty() {
                        None
                    } else {
                        Some(content)
                    };

                    if in_channel_tag {
                        channel.set(&name, content.clone());
                    }
                    if let Some(item) = current_item.as_mut() {
                        item.insert(name.clone(), content);
                    }
                }

                in_channel_tag = false;
                if name == "item" {
                    if let Some(item) = current_item.take() {
                        items.push(item);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {} // declarations, comments, processing instructions
            Err(e) => return Err(StripError::Parse(e.to_string())),
        }
    }

    Ok(RawFeed { channel, items })
}
