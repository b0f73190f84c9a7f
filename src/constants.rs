//! Shared constants used across the collector.

/// Desktop browser user agent sent with forum requests.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Offset of Korea Standard Time from UTC, in seconds.
pub const KST_OFFSET_SECS: i32 = 9 * 3600;

pub const YOUTUBE_SNAPSHOT_FILE: &str = "youtube.json";
pub const YOUTUBE_PREV_SNAPSHOT_FILE: &str = "youtube_prev.json";
pub const FORUM_SNAPSHOT_FILE: &str = "okinews.json";
pub const TRENDING_SNAPSHOT_FILE: &str = "trending.json";
