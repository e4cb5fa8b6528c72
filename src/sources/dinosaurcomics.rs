use scraper::{Html, Selector};

use crate::domain::StripNumber;
use crate::errors::StripResult;
use crate::fetch::Fetcher;
use crate::html::{clean_string, ImageDescriptor};
use crate::parser::RawItem;
use crate::sources::traits::{number_after_last, ComicSource, SourceConfig};

/// Dinosaur Comics (qwantz.com), published through RSSPECT.
///
/// The description HTML carries several images; the strip itself is the one
/// tagged with the `comic` class.
pub struct DinosaurComicsSource {
    config: SourceConfig,
}

impl DinosaurComicsSource {
    pub fn new() -> Self {
        Self {
            config: SourceConfig::new("dinosaurcomics", "http://www.rsspect.com/rss/qwantz.xml"),
        }
    }
}

impl Default for DinosaurComicsSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ComicSource for DinosaurComicsSource {
    fn config(&self) -> &SourceConfig {
        &self.config
    }

    fn number(&self, item: &RawItem) -> StripResult<StripNumber> {
        // http://www.qwantz.com/index.php?comic=<number>
        let link = self.require(item, "link")?;
        number_after_last(link, '=')
            .map(StripNumber::from)
            .ok_or_else(|| self.missing_field("number"))
    }

    fn image(&self, item: &RawItem, _fetcher: &dyn Fetcher) -> StripResult<Option<ImageDescriptor>> {
        let description = match item.get("description") {
            Some(description) => description,
            None => return Ok(None),
        };

        let document = Html::parse_fragment(description);
        let selector = Selector::parse("img.comic").unwrap();

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
            title: clean_string(element.value().attr("title")),
            alt: clean_string(element.value().attr("alt")),
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
    fn test_number_from_link() {
        let source = DinosaurComicsSource::new();
        let item = test_item(&[("link", "http://www.qwantz.com/index.php?comic=2437")]);
        assert_eq!(source.number(&item).unwrap(), StripNumber::Numeric(2437));
    }

    #[test]
    fn test_image_selected_by_comic_class() {
        let source = DinosaurComicsSource::new();
        let item = test_item(&[(
            "description",
            r#"<img src="http://www.qwantz.com/mailbag.png" title="write in!" />
               <img class="comic" src="http://www.qwantz.com/comics/comic2-2437.png" title="the mouseover joke" />"#,
        )]);

        let image = source.image(&item, &MockFetcher::new()).unwrap().unwrap();
        assert_eq!(image.src, "http://www.qwantz.com/comics/comic2-2437.png");
        assert_eq!(image.title.as_deref(), Some("the mouseover joke"));
    }

    #[test]
    fn test_no_comic_class_image_means_none() {
        let source = DinosaurComicsSource::new();
        let item = test_item(&[(
            "description",
            r#"<img src="http://www.qwantz.com/mailbag.png" title="not the comic" />"#,
        )]);
        assert_eq!(source.image(&item, &MockFetcher::new()).unwrap(), None);
    }
}
