//! Collects recent short-form videos per channel and their comments.

use std::path::Path;

use anyhow::Result;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::source::{CommentFetcher, ListingFetcher};
use crate::config::Limits;
use crate::constants::YOUTUBE_SNAPSHOT_FILE;
use crate::models::{null_as_default, Comment, Video, YoutubeSnapshot};
use crate::snapshot::{collected_at, write_snapshot};

/// One line of `yt-dlp --flat-playlist --dump-json` output.
#[derive(Debug, Deserialize)]
struct ListingEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    title: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    webpage_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    channel: String,
    #[serde(default, deserialize_with = "null_as_default")]
    view_count: u64,
    #[serde(default)]
    duration: Option<serde_json::Number>,
    #[serde(default, deserialize_with = "null_as_default")]
    upload_date: String,
}

impl ListingEntry {
    fn into_video(self, channel_id: &str) -> Video {
        let url = [self.url, self.webpage_url]
            .into_iter()
            .flatten()
            .find(|u| !u.is_empty())
            .unwrap_or_else(|| format!("https://youtube.com/shorts/{}", self.id));

        Video {
            id: self.id,
            title: self.title,
            url,
            channel: self.channel,
            channel_id: channel_id.to_string(),
            view_count: self.view_count,
            duration: self.duration,
            upload_date: self.upload_date,
            comments: Vec::new(),
            comment_count: 0,
        }
    }
}

/// Final JSON object of a `--write-comments --dump-json` run.
#[derive(Debug, Deserialize)]
struct CommentDump {
    #[serde(default, deserialize_with = "null_as_default")]
    comments: Vec<Comment>,
}

/// Outcome of a collection pass.
#[derive(Debug, Default)]
pub struct VideoCollection {
    pub videos: Vec<Video>,
    /// Channels for which neither the shorts nor the videos tab produced anything.
    pub failed_channels: Vec<String>,
    /// Videos whose comment fetch failed and were stored with no comments.
    pub failed_comment_fetches: Vec<String>,
}

impl VideoCollection {
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !self.failed_channels.is_empty() || !self.failed_comment_fetches.is_empty()
    }
}

/// Parse line-delimited listing output, skipping blank and malformed lines.
#[must_use]
pub fn parse_listing_output(output: &str, channel_id: &str) -> Vec<Video> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match serde_json::from_str::<ListingEntry>(line) {
            Ok(entry) => Some(entry.into_video(channel_id)),
            Err(e) => {
                debug!(channel_id = %channel_id, error = %e, "Skipping malformed listing line");
                None
            }
        })
        .collect()
}

/// Parse comment output: the last non-blank line holds the video JSON.
///
/// # Errors
///
/// Returns an error if the output is empty or the last line is not valid JSON.
pub fn parse_comment_output(output: &str, max_comments: usize) -> Result<Vec<Comment>> {
    let last = output
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or_else(|| anyhow::anyhow!("comment fetch produced no output"))?;

    let mut dump: CommentDump = serde_json::from_str(last)?;
    dump.comments.truncate(max_comments);
    Ok(dump.comments)
}

fn channel_tab_url(channel_id: &str, tab: &str) -> String {
    format!("https://www.youtube.com/channel/{channel_id}/{tab}")
}

/// List a channel's shorts, falling back to its videos tab.
///
/// Returns `None` when both tabs failed or produced nothing usable.
async fn list_channel(
    listing: &dyn ListingFetcher,
    channel_id: &str,
    limit: usize,
) -> Option<Vec<Video>> {
    for tab in ["shorts", "videos"] {
        let url = channel_tab_url(channel_id, tab);
        match listing.fetch_listing(&url, limit).await {
            Ok(output) => {
                let mut videos = parse_listing_output(&output, channel_id);
                if !videos.is_empty() {
                    videos.truncate(limit);
                    debug!(channel_id = %channel_id, tab, count = videos.len(), "Listed channel videos");
                    return Some(videos);
                }
                debug!(channel_id = %channel_id, tab, "Listing returned no videos");
            }
            Err(e) => {
                debug!(channel_id = %channel_id, tab, error = %e, "Listing failed");
            }
        }
    }
    None
}

/// Collect videos across `channels` in order and attach their comments.
///
/// A failure for one channel or one video never stops the others.
pub async fn collect_videos(
    listing: &dyn ListingFetcher,
    comments: &dyn CommentFetcher,
    channels: &[String],
    limits: &Limits,
) -> VideoCollection {
    let mut collection = VideoCollection::default();

    for channel_id in channels {
        match list_channel(listing, channel_id, limits.videos_per_channel).await {
            Some(videos) => collection.videos.extend(videos),
            None => {
                warn!(channel_id = %channel_id, "Channel video list failed");
                collection.failed_channels.push(channel_id.clone());
            }
        }
    }

    collection.videos.truncate(limits.max_videos);

    for video in &mut collection.videos {
        let fetched = match comments
            .fetch_comments(&video.id, limits.comments_per_video)
            .await
        {
            Ok(output) => parse_comment_output(&output, limits.comments_per_video),
            Err(e) => Err(e),
        };

        match fetched {
            Ok(list) => video.set_comments(list),
            Err(e) => {
                warn!(video_id = %video.id, "Comments fetch failed: {e:#}");
                collection.failed_comment_fetches.push(video.id.clone());
                video.set_comments(Vec::new());
            }
        }
    }

    info!(
        videos = collection.videos.len(),
        failed_channels = collection.failed_channels.len(),
        failed_comment_fetches = collection.failed_comment_fetches.len(),
        "YouTube collection finished"
    );

    collection
}

/// Write `youtube.json` into `data_dir`.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be written.
pub async fn save_youtube_snapshot(data_dir: &Path, videos: &[Video]) -> Result<()> {
    let snapshot = YoutubeSnapshot {
        collected_at: collected_at(),
        videos: videos.to_vec(),
    };
    write_snapshot(&data_dir.join(YOUTUBE_SNAPSHOT_FILE), &snapshot).await
}
