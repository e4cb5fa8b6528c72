use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

/// Normalized `<img>` tag pulled out of a description or comic page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub src: String,
    pub title: Option<String>,
    pub alt: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ImageDescriptor {
    /// Caption for display/alt-text purposes: the title attribute, falling
    /// back to alt when no title was present.
    pub fn caption(&self) -> Option<&str> {
        self.title.as_deref().or(self.alt.as_deref())
    }
}

/// Trimmed string, with empty results collapsed to `None`.
pub fn clean_string(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Non-negative integer, or `None` for anything that is not all digits.
pub fn clean_int(value: Option<&str>) -> Option<u32> {
    let value = value?.trim();
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        value.parse().ok()
    } else {
        None
    }
}

/// Find every `<img>` in an HTML fragment, in document order.
///
/// Images without a usable `src` are skipped. When `require_title` is set,
/// images without a title attribute are assumed to be decorative chrome
/// rather than comic art and are skipped before the alt fallback applies.
/// Dimensions are kept only when both attributes parse; partial dimension
/// data is untrustworthy and discarded.
pub fn extract_images(html: &str, require_title: bool) -> Vec<ImageDescriptor> {
    let document = Html::parse_fragment(html);
    let selector = Selector::parse("img").unwrap();

    let mut result = Vec::new();
    for element in document.select(&selector) {
        let src = match clean_string(element.value().attr("src")) {
            Some(src) => src,
            None => continue,
        };

        let title = clean_string(element.value().attr("title"));
        if require_title && title.is_none() {
            continue;
        }

        let alt = clean_string(element.value().attr("alt"));

        let mut width = clean_int(element.value().attr("width"));
        let mut height = clean_int(element.value().attr("height"));
        if width.is_none() || height.is_none() {
            width = None;
            height = None;
        }

        result.push(ImageDescriptor {
            src,
            title,
            alt,
            width,
            height,
        });
    }

    result
}
