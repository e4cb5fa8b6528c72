use crate::domain::StripNumber;
use crate::errors::StripResult;
use crate::parser::RawItem;
use crate::sources::traits::{ComicSource, SourceConfig};

/// Wondermark, published through Feedburner.
///
/// Strip items encode both number and title in the raw title tag, e.g.
/// `#934; In which a plan is hatched`. Items missing the `;`/`#` markers are
/// blog posts, not comics. The feed's link points at Feedburner, so the
/// canonical URL is rebuilt from the number.
pub struct WondermarkSource {
    config: SourceConfig,
}

impl WondermarkSource {
    pub fn new() -> Self {
        Self {
            config: SourceConfig::new("wondermark", "http://feeds.feedburner.com/wondermark"),
        }
    }

    fn numeric_part(&self, item: &RawItem) -> StripResult<i64> {
        let title = self.require(item, "title")?;
        title
            .split_once(';')
            .and_then(|(number, _)| number.trim().trim_start_matches('#').parse().ok())
            .ok_or_else(|| self.missing_field("number"))
    }
}

impl Default for WondermarkSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ComicSource for WondermarkSource {
    fn config(&self) -> &SourceConfig {
        &self.config
    }

    fn is_comic(&self, item: &RawItem) -> bool {
        item.get("title")
            .is_some_and(|title| title.contains(';') && title.contains('#'))
    }

    fn number(&self, item: &RawItem) -> StripResult<StripNumber> {
        Ok(StripNumber::Numeric(self.numeric_part(item)?))
    }

    fn title(&self, item: &RawItem) -> StripResult<Option<String>> {
        let title = self.require(item, "title")?;
        Ok(title
            .split_once(';')
            .map(|(_, rest)| rest.trim().to_string()))
    }

    fn page_url(&self, item: &RawItem) -> StripResult<String> {
        Ok(format!("http://wondermark.com/{}/", self.numeric_part(item)?))
    }
}
