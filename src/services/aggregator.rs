use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::domain::{compute_guid, ComicFeed, Strip, StripNumber};
use crate::errors::{StripError, StripResult};
use crate::fetch::Fetcher;
use crate::parser::{self, RawItem};
use crate::sources::ComicSource;

/// Orchestrates fetch → parse → per-item adapter invocation → filter/sort.
///
/// Each call is independent; no state survives between fetches, so separate
/// calls are safe to run concurrently from separate threads.
pub struct Aggregator {
    fetcher: Box<dyn Fetcher>,
}

impl Aggregator {
    pub fn new(fetcher: Box<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    /// Fetch and normalize a source's current strips.
    ///
    /// `since` keeps only strips published at or after the watermark;
    /// `exclude_guids` drops strips already seen. The result is sorted
    /// ascending by publish date regardless of feed order.
    pub fn fetch(
        &self,
        source: &dyn ComicSource,
        since: Option<DateTime<Utc>>,
        exclude_guids: &HashSet<String>,
    ) -> StripResult<Vec<Strip>> {
        Ok(self.fetch_feed(source, since, exclude_guids)?.strips)
    }

    /// Like `fetch`, but also carries the parsed channel metadata.
    pub fn fetch_feed(
        &self,
        source: &dyn ComicSource,
        since: Option<DateTime<Utc>>,
        exclude_guids: &HashSet<String>,
    ) -> StripResult<ComicFeed> {
        let config = source.config();

        // Primary fetch and parse failures abort the whole run
        let body = self.fetcher.get(config.feed_url, &config.request_headers)?;
        let raw = parser::parse(&body)?;

        let mut strips = Vec::new();
        for item in &raw.items {
            match self.build_strip(source, item, since, exclude_guids) {
                Ok(Some(strip)) => strips.push(strip),
                Ok(None) => {}
                Err(e @ StripError::ImageNotFound { .. }) if config.missing_image_fatal => {
                    return Err(e)
                }
                Err(e) if e.is_item_level() => {
                    // One bad item must not block the rest of the refresh
                    eprintln!("Dropping item: {}", e);
                }
                Err(e) => return Err(e),
            }
        }

        strips.sort_by_key(|strip| strip.publish_date);

        Ok(ComicFeed {
            channel: raw.channel,
            strips,
        })
    }

    fn build_strip(
        &self,
        source: &dyn ComicSource,
        item: &RawItem,
        since: Option<DateTime<Utc>>,
        exclude_guids: &HashSet<String>,
    ) -> StripResult<Option<Strip>> {
        if !source.is_comic(item) {
            return Ok(None);
        }

        let number = source.number(item)?;
        let guid = compute_guid(source.name(), &number);
        if exclude_guids.contains(&guid) {
            return Ok(None);
        }

        // A strip without art is not a strip. Secondary-fetch failures are
        // equivalent to "image not found" for this item only.
        let image = match source.image(item, &*self.fetcher) {
            Ok(Some(image)) => image,
            Ok(None) => return Err(image_not_found(source, &number)),
            Err(e) if source.config().missing_image_fatal => return Err(e),
            Err(e) => {
                eprintln!("[{}] image fetch failed for {}: {}", source.name(), number, e);
                return Err(image_not_found(source, &number));
            }
        };

        let publish_date = source.publish_date(item)?;
        if let Some(since) = since {
            if publish_date < since {
                return Ok(None);
            }
        }

        Ok(Some(Strip {
            publish_date,
            url: source.page_url(item)?,
            image_url: image.src.clone(),
            guid,
            title: source.title(item)?,
            alt_text: image.caption().map(str::to_string),
            number,
        }))
    }
}

fn image_not_found(source: &dyn ComicSource, number: &StripNumber) -> StripError {
    StripError::ImageNotFound {
        source_name: source.name().to_string(),
        number: number.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MockFetcher;
    use crate::sources::toothpastefordinner::ToothpasteForDinnerSource;
    use crate::sources::xkcd::XkcdSource;
    use chrono::TimeZone;

    const XKCD_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>xkcd.com</title>
    <link>http://xkcd.com/</link>
    <description>xkcd.com: A webcomic of romance and math.</description>
    <language>en</language>
    <item>
      <title>Time</title>
      <link>http://xkcd.com/1190/</link>
      <description>&lt;img src="http://imgs.xkcd.com/comics/time.png" alt="Wait for it." /&gt;</description>
      <pubDate>Thu, 04 Apr 2013 04:00:00 +0000</pubDate>
      <guid>http://xkcd.com/1190/</guid>
    </item>
    <item>
      <title>Subduction License</title>
      <link>http://xkcd.com/1189/</link>
      <description>&lt;img src="http://imgs.xkcd.com/comics/subduction_license.png" alt="Geology joke." /&gt;</description>
      <pubDate>Wed, 03 Apr 2013 04:00:00 +0000</pubDate>
      <guid>http://xkcd.com/1189/</guid>
    </item>
    <item>
      <title>Bonding</title>
      <link>http://xkcd.com/1188/</link>
      <description>&lt;img src="http://imgs.xkcd.com/comics/bonding.png" alt="Chemistry joke." /&gt;</description>
      <pubDate>Tue, 02 Apr 2013 04:00:00 +0000</pubDate>
      <guid>http://xkcd.com/1188/</guid>
    </item>
    <item>
      <title>Aspect Ratio</title>
      <link>http://xkcd.com/1187/</link>
      <description>&lt;img src="http://imgs.xkcd.com/comics/aspect_ratio.png" alt="Movie joke." /&gt;</description>
      <pubDate>Mon, 01 Apr 2013 04:00:00 +0000</pubDate>
      <guid>http://xkcd.com/1187/</guid>
    </item>
  </channel>
</rss>"#;

    fn xkcd_aggregator() -> Aggregator {
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_get()
            .returning(|_, _| Ok(XKCD_FEED.as_bytes().to_vec()));
        Aggregator::new(Box::new(fetcher))
    }

    fn utc(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2013, 4, day, 4, 0, 0).unwrap()
    }

    #[test]
    fn test_strips_sorted_ascending_by_publish_date() {
        let aggregator = xkcd_aggregator();
        let strips = aggregator
            .fetch(&XkcdSource::new(), None, &HashSet::new())
            .unwrap();

        assert_eq!(strips.len(), 4);
        // The feed is newest-first; output must be oldest-first
        let dates: Vec<_> = strips.iter().map(|s| s.publish_date).collect();
        assert_eq!(dates, vec![utc(1), utc(2), utc(3), utc(4)]);
        assert_eq!(strips[0].title.as_deref(), Some("Aspect Ratio"));
        assert_eq!(strips[0].alt_text.as_deref(), Some("Movie joke."));
    }

    #[test]
    fn test_guids_idempotent_across_runs() {
        let aggregator = xkcd_aggregator();
        let source = XkcdSource::new();

        let first = aggregator.fetch(&source, None, &HashSet::new()).unwrap();
        let second = aggregator.fetch(&source, None, &HashSet::new()).unwrap();

        let first_guids: Vec<_> = first.iter().map(|s| s.guid.clone()).collect();
        let second_guids: Vec<_> = second.iter().map(|s| s.guid.clone()).collect();
        assert_eq!(first_guids, second_guids);
    }

    #[test]
    fn test_since_watermark_keeps_at_or_after() {
        let aggregator = xkcd_aggregator();
        let strips = aggregator
            .fetch(&XkcdSource::new(), Some(utc(3)), &HashSet::new())
            .unwrap();

        let dates: Vec<_> = strips.iter().map(|s| s.publish_date).collect();
        assert_eq!(dates, vec![utc(3), utc(4)]);
    }

    #[test]
    fn test_exclude_guids_yields_only_new_strips() {
        let aggregator = xkcd_aggregator();
        let source = XkcdSource::new();

        let all = aggregator.fetch(&source, None, &HashSet::new()).unwrap();
        let seen: HashSet<String> = all.iter().take(3).map(|s| s.guid.clone()).collect();

        let fresh = aggregator.fetch(&source, None, &seen).unwrap();
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].guid, all[3].guid);

        let everything_seen: HashSet<String> = all.iter().map(|s| s.guid.clone()).collect();
        assert!(aggregator
            .fetch(&source, None, &everything_seen)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_item_without_image_dropped_run_continues() {
        let feed = r#"<rss><channel>
            <item>
              <title>Broken</title>
              <link>http://xkcd.com/1191/</link>
              <description>no image markup here</description>
              <pubDate>Fri, 05 Apr 2013 04:00:00 +0000</pubDate>
            </item>
            <item>
              <title>Time</title>
              <link>http://xkcd.com/1190/</link>
              <description>&lt;img src="http://imgs.xkcd.com/comics/time.png" alt="Wait for it." /&gt;</description>
              <pubDate>Thu, 04 Apr 2013 04:00:00 +0000</pubDate>
            </item>
        </channel></rss>"#
            .to_string();

        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_get()
            .returning(move |_, _| Ok(feed.as_bytes().to_vec()));

        let strips = Aggregator::new(Box::new(fetcher))
            .fetch(&XkcdSource::new(), None, &HashSet::new())
            .unwrap();

        assert_eq!(strips.len(), 1);
        assert_eq!(strips[0].title.as_deref(), Some("Time"));
    }

    #[test]
    fn test_empty_title_element_keeps_item_with_no_title() {
        let feed = r#"<rss><channel>
            <item>
              <title></title>
              <link>http://xkcd.com/1190/</link>
              <description>&lt;img src="http://imgs.xkcd.com/comics/time.png" alt="Wait for it." /&gt;</description>
              <pubDate>Thu, 04 Apr 2013 04:00:00 +0000</pubDate>
            </item>
        </channel></rss>"#
            .to_string();

        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_get()
            .returning(move |_, _| Ok(feed.as_bytes().to_vec()));

        let strips = Aggregator::new(Box::new(fetcher))
            .fetch(&XkcdSource::new(), None, &HashSet::new())
            .unwrap();

        assert_eq!(strips.len(), 1);
        assert_eq!(strips[0].title, None);
        assert_eq!(strips[0].alt_text.as_deref(), Some("Wait for it."));
    }

    #[test]
    fn test_secondary_fetch_failure_drops_item_run_continues() {
        let feed = r#"<rss><channel>
            <item>
              <title>Cyanide &amp; Happiness</title>
              <link>http://www.explosm.net/comics/3104/</link>
              <guid>http://www.explosm.net/comics/3104/</guid>
              <description>New Cyanide and Happiness Comic.</description>
              <pubDate>Thu, 04 Apr 2013 04:00:00 +0000</pubDate>
            </item>
            <item>
              <title>Cyanide &amp; Happiness</title>
              <link>http://www.explosm.net/comics/3103/</link>
              <guid>http://www.explosm.net/comics/3103/</guid>
              <description>New Cyanide and Happiness Comic.</description>
              <pubDate>Wed, 03 Apr 2013 04:00:00 +0000</pubDate>
            </item>
        </channel></rss>"#;

        let mut fetcher = MockFetcher::new();
        fetcher.expect_get().returning(|url, _| {
            if url.contains("feedburner") {
                Ok(feed.as_bytes().to_vec())
            } else if url.contains("3104") {
                // strip page is down; only this item's image is lost
                Err(StripError::UpstreamFetch(format!("{} returned 503", url)))
            } else {
                Ok(br#"<div id="maincontent">
                    <img src="http://www.explosm.net/db/files/Comics/3103.png"
                         alt="Cyanide and Happiness, a daily webcomic" />
                </div>"#
                    .to_vec())
            }
        });

        let strips = Aggregator::new(Box::new(fetcher))
            .fetch(
                &crate::sources::cyanide::CyanideSource::new(),
                None,
                &HashSet::new(),
            )
            .unwrap();

        assert_eq!(strips.len(), 1);
        assert_eq!(
            strips[0].image_url,
            "http://www.explosm.net/db/files/Comics/3103.png"
        );
    }

    #[test]
    fn test_item_with_unextractable_number_dropped() {
        let feed = r#"<rss><channel>
            <item>
              <title>About</title>
              <link>http://xkcd.com/about/</link>
              <description>&lt;img src="http://imgs.xkcd.com/static/about.png" alt="about" /&gt;</description>
              <pubDate>Fri, 05 Apr 2013 04:00:00 +0000</pubDate>
            </item>
            <item>
              <title>Time</title>
              <link>http://xkcd.com/1190/</link>
              <description>&lt;img src="http://imgs.xkcd.com/comics/time.png" alt="Wait for it." /&gt;</description>
              <pubDate>Thu, 04 Apr 2013 04:00:00 +0000</pubDate>
            </item>
        </channel></rss>"#
            .to_string();

        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_get()
            .returning(move |_, _| Ok(feed.as_bytes().to_vec()));

        let strips = Aggregator::new(Box::new(fetcher))
            .fetch(&XkcdSource::new(), None, &HashSet::new())
            .unwrap();

        assert_eq!(strips.len(), 1);
        assert_eq!(strips[0].guid, compute_guid("xkcd", &StripNumber::Numeric(1190)));
    }

    #[test]
    fn test_primary_fetch_failure_aborts_run() {
        let mut fetcher = MockFetcher::new();
        fetcher.expect_get().returning(|url, _| {
            Err(StripError::UpstreamFetch(format!("{} returned 503", url)))
        });

        let result = Aggregator::new(Box::new(fetcher)).fetch(
            &XkcdSource::new(),
            None,
            &HashSet::new(),
        );
        assert!(matches!(result, Err(StripError::UpstreamFetch(_))));
    }

    #[test]
    fn test_malformed_feed_aborts_run() {
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_get()
            .returning(|_, _| Ok(b"<rss><channel><item></channel></rss>".to_vec()));

        let result = Aggregator::new(Box::new(fetcher)).fetch(
            &XkcdSource::new(),
            None,
            &HashSet::new(),
        );
        assert!(matches!(result, Err(StripError::Parse(_))));
    }

    #[test]
    fn test_fatal_adapter_aborts_run_on_missing_image() {
        let feed = r#"<rss><channel><item>
            <title>actual people</title>
            <link>http://toothpastefordinner.com/index.php?x=042413</link>
            <guid>http://toothpastefordinner.com/index.php?x=042413</guid>
            <pubDate>Wed, 24 Apr 2013 00:01:00 -0400</pubDate>
        </item></channel></rss>"#;

        let mut fetcher = MockFetcher::new();
        fetcher.expect_get().returning(move |url, _| {
            if url.contains("rss.php") {
                Ok(feed.as_bytes().to_vec())
            } else {
                // strip page with no matching comic image
                Ok(b"<html><body><p>under construction</p></body></html>".to_vec())
            }
        });

        let result = Aggregator::new(Box::new(fetcher)).fetch(
            &ToothpasteForDinnerSource::new(),
            None,
            &HashSet::new(),
        );
        assert!(matches!(result, Err(StripError::ImageNotFound { .. })));
    }

    #[test]
    fn test_fetch_feed_carries_channel_metadata() {
        let aggregator = xkcd_aggregator();
        let feed = aggregator
            .fetch_feed(&XkcdSource::new(), None, &HashSet::new())
            .unwrap();

        assert_eq!(feed.channel.title.as_deref(), Some("xkcd.com"));
        assert_eq!(feed.channel.link.as_deref(), Some("http://xkcd.com/"));
        assert_eq!(feed.channel.language.as_deref(), Some("en"));
        assert_eq!(feed.strips.len(), 4);
    }
}
