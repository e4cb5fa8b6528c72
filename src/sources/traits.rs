use chrono::{DateTime, FixedOffset, Utc};

use crate::domain::StripNumber;
use crate::errors::{StripError, StripResult};
use crate::fetch::Fetcher;
use crate::html::{self, ImageDescriptor};
use crate::parser::RawItem;

/// Static per-comic configuration shared by every adapter.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Stable key used in guid hashing. Renaming it invalidates every guid
    /// previously stored for the source.
    pub name: &'static str,
    pub feed_url: &'static str,
    /// Whether an `<img>` without a title attribute is rejected as
    /// not-the-comic-image during default extraction.
    pub requires_title_on_image: bool,
    /// Extra headers sent on the primary fetch and on per-item page fetches.
    pub request_headers: Vec<(String, String)>,
    /// Whether a strip without a resolvable image aborts the whole run
    /// instead of being dropped.
    pub missing_image_fatal: bool,
}

impl SourceConfig {
    pub fn new(name: &'static str, feed_url: &'static str) -> Self {
        Self {
            name,
            feed_url,
            requires_title_on_image: true,
            request_headers: Vec::new(),
            missing_image_fatal: false,
        }
    }

    pub fn without_image_titles(mut self) -> Self {
        self.requires_title_on_image = false;
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.request_headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_fatal_missing_image(mut self) -> Self {
        self.missing_image_fatal = true;
        self
    }
}

/// Source-specific ruleset translating a raw feed item into strip fields.
///
/// Variants override only the operations where their feed deviates from the
/// shared defaults: title passes through the raw `title` tag, the canonical
/// URL is the raw `link` tag, and the image is the first extractor hit over
/// the item's description.
pub trait ComicSource: Send + Sync {
    fn config(&self) -> &SourceConfig;

    fn name(&self) -> &str {
        self.config().name
    }

    /// Whether the raw item is actually a comic strip, as opposed to an ad,
    /// a side project, or a text-only post.
    fn is_comic(&self, _item: &RawItem) -> bool {
        true
    }

    /// Stable per-strip identifier. Failure to extract it is an error, never
    /// a silent default.
    fn number(&self, item: &RawItem) -> StripResult<StripNumber>;

    /// Display title; `None` means "derive one elsewhere" (e.g. from the
    /// number). An absent or empty title tag passes through as `None`; a
    /// strip is still a strip without one.
    fn title(&self, item: &RawItem) -> StripResult<Option<String>> {
        Ok(item.get("title").map(str::to_string))
    }

    /// Publish date in UTC, parsed from the RFC-822 `pubDate` tag.
    fn publish_date(&self, item: &RawItem) -> StripResult<DateTime<Utc>> {
        Ok(self.publish_date_local(item)?.with_timezone(&Utc))
    }

    /// Publish date with the feed's own UTC offset preserved.
    fn publish_date_local(&self, item: &RawItem) -> StripResult<DateTime<FixedOffset>> {
        let raw = self.require(item, "pubDate")?;
        DateTime::parse_from_rfc2822(raw).map_err(|_| self.missing_field("pubDate"))
    }

    /// Locate the comic image. `Ok(None)` means no image was found; whether
    /// that drops the item or the run is decided by `missing_image_fatal`.
    fn image(&self, item: &RawItem, _fetcher: &dyn Fetcher) -> StripResult<Option<ImageDescriptor>> {
        let description = match item.get("description") {
            Some(description) => description,
            None => return Ok(None),
        };

        let images = html::extract_images(description, self.config().requires_title_on_image);
        Ok(images.into_iter().next())
    }

    /// Canonical strip page URL.
    fn page_url(&self, item: &RawItem) -> StripResult<String> {
        Ok(self.require(item, "link")?.to_string())
    }

    /// Required tag lookup, reported with the item-level error kind.
    fn require<'a>(&self, item: &'a RawItem, tag: &str) -> StripResult<&'a str> {
        item.get(tag).ok_or_else(|| self.missing_field(tag))
    }

    fn missing_field(&self, field: &str) -> StripError {
        StripError::MissingField {
            source_name: self.name().to_string(),
            field: field.to_string(),
        }
    }
}

/// Substring after the last `sep`, parsed as an integer. Several comics
/// encode the strip number as the final query-string value of their links.
pub(crate) fn number_after_last(value: &str, sep: char) -> Option<i64> {
    value.rsplit(sep).next().and_then(|s| s.parse().ok())
}
