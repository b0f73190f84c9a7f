use std::path::Path;

use anyhow::Result;
use tracing::{debug, error, info};

use super::fetch::PageFetcher;
use super::listing::{dedupe_posts, parse_listing};
use super::preview::extract_preview;
use crate::config::Config;
use crate::constants::FORUM_SNAPSHOT_FILE;
use crate::models::{ForumPost, ForumSnapshot};
use crate::snapshot::{collected_at, write_snapshot};

/// Outcome of a forum scrape.
#[derive(Debug, Default)]
pub struct ForumScrape {
    pub posts: Vec<ForumPost>,
    /// The listing page itself could not be fetched.
    pub listing_failed: bool,
    /// Posts whose preview was wanted but stayed empty.
    pub previews_missing: usize,
}

/// Scrape the board listing and fill previews for the first posts.
///
/// Never fails: a listing failure is logged and yields no posts.
pub async fn scrape_forum(fetcher: &dyn PageFetcher, config: &Config) -> ForumScrape {
    let html = match fetcher
        .fetch_page(&config.forum_list_url, config.forum_list_timeout)
        .await
    {
        Ok(html) => html,
        Err(e) => {
            error!(url = %config.forum_list_url, "Forum listing fetch failed: {e:?}");
            return ForumScrape {
                listing_failed: true,
                ..ForumScrape::default()
            };
        }
    };

    let parsed = parse_listing(&html, &config.forum_base_url);
    let found = parsed.len();
    let mut posts = dedupe_posts(parsed, config.limits.max_posts);
    debug!(found, kept = posts.len(), "Parsed forum listing");

    let mut previews_missing = 0;
    for post in posts.iter_mut().take(config.limits.preview_posts) {
        match fetcher
            .fetch_page(&post.url, config.forum_detail_timeout)
            .await
        {
            Ok(page) => post.preview = extract_preview(&page),
            Err(e) => debug!(id = %post.id, error = %e, "Preview fetch failed"),
        }
        if post.preview.is_empty() {
            previews_missing += 1;
        }
    }

    info!(posts = posts.len(), previews_missing, "Forum scrape finished");

    ForumScrape {
        posts,
        listing_failed: false,
        previews_missing,
    }
}

/// Write `okinews.json` into `data_dir`.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be written.
pub async fn save_forum_snapshot(data_dir: &Path, posts: &[ForumPost]) -> Result<()> {
    let snapshot = ForumSnapshot {
        collected_at: collected_at(),
        posts: posts.to_vec(),
    };
    write_snapshot(&data_dir.join(FORUM_SNAPSHOT_FILE), &snapshot).await
}
