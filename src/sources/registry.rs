use crate::sources::traits::ComicSource;
use crate::sources::{
    asofterworld::ASofterWorldSource, ctrlaltdel::CtrlAltDelSource, cyanide::CyanideSource,
    dinosaurcomics::DinosaurComicsSource, marriedtothesea::MarriedToTheSeaSource,
    smbc::SmbcSource, toothpastefordinner::ToothpasteForDinnerSource,
    wondermark::WondermarkSource, xkcd::XkcdSource,
};

/// Catalog of supported comics, keyed by stable source name.
pub struct SourceRegistry {
    sources: Vec<Box<dyn ComicSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            sources: Vec::new(),
        };

        registry.register(Box::new(ASofterWorldSource::new()));
        registry.register(Box::new(WondermarkSource::new()));
        registry.register(Box::new(DinosaurComicsSource::new()));
        registry.register(Box::new(XkcdSource::new()));
        registry.register(Box::new(SmbcSource::new()));
        registry.register(Box::new(CyanideSource::new()));
        registry.register(Box::new(CtrlAltDelSource::new()));
        registry.register(Box::new(ToothpasteForDinnerSource::new()));
        registry.register(Box::new(MarriedToTheSeaSource::new()));

        registry
    }

    pub fn register(&mut self, source: Box<dyn ComicSource>) {
        self.sources.push(source);
    }

    /// Look up an adapter by its stable source name.
    pub fn get(&self, name: &str) -> Option<&dyn ComicSource> {
        self.sources
            .iter()
            .find(|s| s.name() == name)
            .map(|s| s.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn ComicSource> {
        self.sources.iter().map(|s| s.as_ref())
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
