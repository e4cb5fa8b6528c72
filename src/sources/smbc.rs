use crate::domain::StripNumber;
use crate::errors::StripResult;
use crate::parser::RawItem;
use crate::sources::traits::{number_after_last, ComicSource, SourceConfig};

/// Saturday Morning Breakfast Cereal, published through Feedburner.
///
/// The `link` tag points at the Feedburner redirect; the real strip URL
/// lives in `feedburner:origLink`, and the strip number is its final
/// query-string value.
pub struct SmbcSource {
    config: SourceConfig,
}

impl SmbcSource {
    pub fn new() -> Self {
        Self {
            config: SourceConfig::new("smbc", "http://feeds.feedburner.com/smbc-comics/PvLb")
                .without_image_titles(),
        }
    }
}

impl Default for SmbcSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ComicSource for SmbcSource {
    fn config(&self) -> &SourceConfig {
        &self.config
    }

    fn page_url(&self, item: &RawItem) -> StripResult<String> {
        Ok(self.require(item, "feedburner:origLink")?.to_string())
    }

    fn number(&self, item: &RawItem) -> StripResult<StripNumber> {
        // http://www.smbc-comics.com/index.php?db=comics&id=<number>
        let url = self.page_url(item)?;
        number_after_last(&url, '=')
            .map(StripNumber::from)
            .ok_or_else(|| self.missing_field("number"))
    }
}
