use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::domain::Strip;
use crate::errors::StripResult;

#[cfg_attr(test, mockall::automock)]
pub trait StripRepository: Send + Sync {
    /// Store a strip. Re-inserting a guid already on record is a no-op.
    fn insert(&self, source_name: &str, strip: &Strip) -> StripResult<()>;

    /// Every guid on record for a source, for exclude-based refreshes.
    fn known_guids(&self, source_name: &str) -> StripResult<HashSet<String>>;

    /// Watermark for incremental fetches.
    fn latest_publish_date(&self, source_name: &str) -> StripResult<Option<DateTime<Utc>>>;

    /// Stored strips ascending by publish date, newest-limited when asked.
    fn strips_for_source(&self, source_name: &str, limit: Option<usize>)
        -> StripResult<Vec<Strip>>;

    fn count(&self, source_name: &str) -> StripResult<i64>;
}
