use crate::domain::ComicFeed;
use crate::errors::StripResult;

/// Render a normalized feed as pretty-printed JSON.
pub fn render(feed: &ComicFeed) -> StripResult<String> {
    Ok(serde_json::to_string_pretty(feed)?)
}
