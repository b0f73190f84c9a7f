use anyhow::Result;
use async_trait::async_trait;

/// Lists the recent videos behind a channel tab URL.
#[async_trait]
pub trait ListingFetcher: Send + Sync {
    /// Return raw listing output: one JSON object per line, at most `limit` entries.
    async fn fetch_listing(&self, url: &str, limit: usize) -> Result<String>;
}

/// Fetches the comments of a single video.
#[async_trait]
pub trait CommentFetcher: Send + Sync {
    /// Return raw output whose last line is a JSON object with a `comments` array.
    async fn fetch_comments(&self, video_id: &str, max_comments: usize) -> Result<String>;
}
