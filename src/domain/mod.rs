pub mod feed;
pub mod strip;

pub use feed::{ChannelMetadata, ComicFeed};
pub use strip::{compute_guid, Strip, StripNumber};
