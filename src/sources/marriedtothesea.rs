use regex::Regex;
use scraper::{Html, Selector};

use crate::domain::StripNumber;
use crate::errors::StripResult;
use crate::fetch::Fetcher;
use crate::html::{clean_string, ImageDescriptor};
use crate::parser::RawItem;
use crate::sources::traits::{ComicSource, SourceConfig};

/// Married To The Sea. Same server setup as Toothpaste For Dinner: a browser
/// user-agent is required or an entirely different site comes back. The
/// feed's `link` tag is wrong; the real strip URL is the anchor inside the
/// description HTML.
pub struct MarriedToTheSeaSource {
    config: SourceConfig,
}

impl MarriedToTheSeaSource {
    pub fn new() -> Self {
        Self {
            config: SourceConfig::new("marriedtothesea", "http://www.marriedtothesea.com/rss/rss.php")
                .with_header("User-Agent", "Mozilla/5.0"),
        }
    }
}

impl Default for MarriedToTheSeaSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ComicSource for MarriedToTheSeaSource {
    fn config(&self) -> &SourceConfig {
        &self.config
    }

    fn page_url(&self, item: &RawItem) -> StripResult<String> {
        let description = self.require(item, "description")?;
        let document = Html::parse_fragment(description);
        let selector = Selector::parse("a").unwrap();

        document
            .select(&selector)
            .next()
            .and_then(|anchor| clean_string(anchor.value().attr("href")))
            .ok_or_else(|| self.missing_field("link in description"))
    }

    fn number(&self, item: &RawItem) -> StripResult<StripNumber> {
        // http://marriedtothesea.com/index.php?x=<number>
        let guid = self.require(item, "guid")?;
        let pattern = Regex::new(r"x=(\d+)").unwrap();
        pattern
            .captures(guid)
            .map(|caps| StripNumber::Tag(caps[1].to_string()))
            .ok_or_else(|| self.missing_field("number"))
    }

    fn image(&self, item: &RawItem, fetcher: &dyn Fetcher) -> StripResult<Option<ImageDescriptor>> {
        let url = self.page_url(item)?;
        let body = fetcher.get(&url, &self.config.request_headers)?;
        let document = Html::parse_document(&String::from_utf8_lossy(&body));

        // yes, the strip container is really called that
        let selector = Selector::parse("div#butts img").unwrap();

        let element = match document.select(&selector).next() {
            Some(element) => element,
            None => return Ok(None),
        };

        let src = match clean_string(element.value().attr("src")) {
            Some(src) => src,
            None => return Ok(None),
        };

        Ok(Some(ImageDescriptor {
            src,
            title: None,
            alt: None,
            width: None,
            height: None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MockFetcher;
    use crate::sources::test_item;

    #[test]
    fn test_canonical_url_from_description_anchor() {
        let source = MarriedToTheSeaSource::new();
        let item = test_item(&[
            ("link", "http://www.marriedtothesea.com/"),
            (
                "description",
                r#"Today's comic: <a href="http://marriedtothesea.com/index.php?x=042413">click here</a>"#,
            ),
        ]);
        assert_eq!(
            source.page_url(&item).unwrap(),
            "http://marriedtothesea.com/index.php?x=042413"
        );
    }

    #[test]
    fn test_description_without_anchor_is_an_error() {
        let source = MarriedToTheSeaSource::new();
        let item = test_item(&[("description", "no anchor in here")]);
        assert!(source.page_url(&item).is_err());
    }

    #[test]
    fn test_number_from_guid_query() {
        let source = MarriedToTheSeaSource::new();
        let item = test_item(&[("guid", "http://marriedtothesea.com/index.php?x=042413")]);
        assert_eq!(
            source.number(&item).unwrap(),
            StripNumber::Tag("042413".to_string())
        );
    }

    #[test]
    fn test_image_from_strip_container() {
        let source = MarriedToTheSeaSource::new();
        let item = test_item(&[(
            "description",
            r#"<a href="http://marriedtothesea.com/index.php?x=042413">today</a>"#,
        )]);

        let mut fetcher = MockFetcher::new();
        fetcher.expect_get().returning(|url, headers| {
            assert_eq!(url, "http://marriedtothesea.com/index.php?x=042413");
            assert_eq!(headers[0].1, "Mozilla/5.0");
            Ok(br#"<html><body>
                <div id="header"><img src="http://mtts.example/logo.png" /></div>
                <div id="butts"><img src="http://mtts.example/042413/business-cats.gif" /></div>
            </body></html>"#
                .to_vec())
        });

        let image = source.image(&item, &fetcher).unwrap().unwrap();
        assert_eq!(image.src, "http://mtts.example/042413/business-cats.gif");
    }
}
