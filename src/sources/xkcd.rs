use crate::domain::StripNumber;
use crate::errors::StripResult;
use crate::parser::RawItem;
use crate::sources::traits::{ComicSource, SourceConfig};

/// xkcd. The description image carries the punchline in its alt attribute
/// rather than a title, so untitled images are not filtered out.
pub struct XkcdSource {
    config: SourceConfig,
}

impl XkcdSource {
    pub fn new() -> Self {
        Self {
            config: SourceConfig::new("xkcd", "http://xkcd.com/rss.xml").without_image_titles(),
        }
    }
}

impl Default for XkcdSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ComicSource for XkcdSource {
    fn config(&self) -> &SourceConfig {
        &self.config
    }

    fn number(&self, item: &RawItem) -> StripResult<StripNumber> {
        // http://xkcd.com/<number>/
        let link = self.require(item, "link")?;
        link.trim_end_matches('/')
            .rsplit('/')
            .next()
            .and_then(|segment| segment.parse::<i64>().ok())
            .map(StripNumber::from)
            .ok_or_else(|| self.missing_field("number"))
    }
}
