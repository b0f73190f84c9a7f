use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::listing::stripped_text;

/// Content containers tried in order on a post page.
const CONTENT_SELECTORS: &[&str] = &[
    ".bbs-view-content",
    ".view-content",
    ".content",
    "td.content",
];

/// A content container must have more than this many characters to count.
const MIN_CONTENT_CHARS: usize = 10;
/// A fallback paragraph must have more than this many characters to count.
const MIN_PARAGRAPH_CHARS: usize = 30;
pub const PREVIEW_CHARS: usize = 100;

static CONTENT: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    CONTENT_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).expect("Invalid selector"))
        .collect()
});
static PARAGRAPH: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("Invalid selector"));

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn longer_than(text: &str, min: usize) -> bool {
    text.chars().count() > min
}

/// Short preview of a post page's body text, or `""` when nothing fits.
#[must_use]
pub fn extract_preview(html: &str) -> String {
    let document = Html::parse_document(html);

    for selector in CONTENT.iter() {
        if let Some(element) = document.select(selector).next() {
            let text = stripped_text(&element);
            if longer_than(&text, MIN_CONTENT_CHARS) {
                return truncate_chars(&text, PREVIEW_CHARS);
            }
        }
    }

    document
        .select(&PARAGRAPH)
        .map(|p| stripped_text(&p))
        .find(|text| longer_than(text, MIN_PARAGRAPH_CHARS))
        .map(|text| truncate_chars(&text, PREVIEW_CHARS))
        .unwrap_or_default()
}
