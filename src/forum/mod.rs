//! Scraping of the Okcheon News public-opinion board.

pub mod cells;
mod fetch;
mod listing;
mod preview;
mod scrape;

pub use fetch::{FetchError, HttpPageFetcher, PageFetcher};
pub use listing::{absolute_post_url, comment_count_from_title, dedupe_posts, parse_listing};
pub use preview::{extract_preview, PREVIEW_CHARS};
pub use scrape::{save_forum_snapshot, scrape_forum, ForumScrape};
