//! Runs the three collection stages in order.

use tracing::{error, info};

use crate::config::Config;
use crate::forum::{save_forum_snapshot, scrape_forum, PageFetcher};
use crate::snapshot::collected_at;
use crate::trending::run_trending;
use crate::youtube::{collect_videos, save_youtube_snapshot, CommentFetcher, ListingFetcher};

/// External capabilities the pipeline needs.
#[derive(Clone, Copy)]
pub struct Sources<'a> {
    pub listing: &'a dyn ListingFetcher,
    pub comments: &'a dyn CommentFetcher,
    pub pages: &'a dyn PageFetcher,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    Ok,
    /// Finished and saved, but some units failed.
    Degraded,
    /// The stage produced no usable output or could not save it.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub youtube: StageStatus,
    pub videos: usize,
    pub forum: StageStatus,
    pub posts: usize,
    pub trending: StageStatus,
    pub trending_items: usize,
    /// `youtube_prev.json` now holds this run's `youtube.json`.
    pub baseline_rotated: bool,
}

impl RunSummary {
    /// True when any stage did not finish cleanly.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        [self.youtube, self.forum, self.trending]
            .iter()
            .any(|s| *s != StageStatus::Ok)
    }
}

/// Run YouTube collection, forum scraping and trending in sequence.
///
/// Every stage runs even when an earlier one failed.
pub async fn run(config: &Config, sources: Sources<'_>) -> RunSummary {
    info!("=== Collecting data at {} ===", collected_at());

    let collection = collect_videos(
        sources.listing,
        sources.comments,
        &config.channels,
        &config.limits,
    )
    .await;
    let youtube = match save_youtube_snapshot(&config.data_dir, &collection.videos).await {
        Ok(()) => {
            info!(videos = collection.videos.len(), "YouTube snapshot saved");
            if collection.is_degraded() {
                StageStatus::Degraded
            } else {
                StageStatus::Ok
            }
        }
        Err(e) => {
            error!("Failed to save YouTube snapshot: {e:#}");
            StageStatus::Failed
        }
    };

    let scrape = scrape_forum(sources.pages, config).await;
    let forum = match save_forum_snapshot(&config.data_dir, &scrape.posts).await {
        Ok(()) => {
            info!(posts = scrape.posts.len(), "Forum snapshot saved");
            if scrape.listing_failed {
                StageStatus::Failed
            } else {
                StageStatus::Ok
            }
        }
        Err(e) => {
            error!("Failed to save forum snapshot: {e:#}");
            StageStatus::Failed
        }
    };

    // Only this run's saved youtube.json may become the next baseline
    let rotate_baseline = youtube != StageStatus::Failed;
    let (trending, trending_items, baseline_rotated) = match run_trending(
        &config.data_dir,
        &collection.videos,
        &config.limits,
        rotate_baseline,
    )
    .await
    {
        Ok(report) => (StageStatus::Ok, report.items.len(), report.rotated),
        Err(e) => {
            error!("Trending failed: {e:#}");
            (StageStatus::Failed, 0, false)
        }
    };

    let summary = RunSummary {
        youtube,
        videos: collection.videos.len(),
        forum,
        posts: scrape.posts.len(),
        trending,
        trending_items,
        baseline_rotated,
    };

    info!(degraded = summary.is_degraded(), "=== Done ===");
    summary
}
