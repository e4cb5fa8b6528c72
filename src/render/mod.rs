pub mod json;
pub mod rss;
