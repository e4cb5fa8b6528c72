pub mod traits;

pub mod asofterworld;
pub mod ctrlaltdel;
pub mod cyanide;
pub mod dinosaurcomics;
pub mod marriedtothesea;
pub mod registry;
pub mod smbc;
pub mod toothpastefordinner;
pub mod wondermark;
pub mod xkcd;

pub use registry::SourceRegistry;
pub use traits::{ComicSource, SourceConfig};

#[cfg(test)]
pub(crate) fn test_item(fields: &[(&str, &str)]) -> crate::parser::RawItem {
    let mut item = crate::parser::RawItem::default();
    for (tag, value) in fields {
        item.insert(tag.to_string(), Some(value.to_string()));
    }
    item
}
