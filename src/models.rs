//! Records written to the JSON snapshots.
//!
//! Field names here are the on-disk contract; downstream consumers read the
//! snapshots directly.

use serde::{Deserialize, Deserializer, Serialize};

/// A short-form video with the comments collected for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub url: String,
    /// Channel display name as reported by yt-dlp.
    pub channel: String,
    /// The configured channel identifier the video was listed under.
    pub channel_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub view_count: u64,
    /// Duration in seconds, kept as yt-dlp reported it (integer or float).
    #[serde(default)]
    pub duration: Option<serde_json::Number>,
    /// `YYYYMMDD` as reported by yt-dlp, empty in flat listings.
    #[serde(default, deserialize_with = "null_as_default")]
    pub upload_date: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub comment_count: usize,
}

impl Video {
    /// Attach fetched comments, keeping `comment_count` in sync.
    pub fn set_comments(&mut self, comments: Vec<Comment>) {
        self.comment_count = comments.len();
        self.comments = comments;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    /// Unix timestamp (seconds).
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub like_count: u64,
    /// Relative display time such as "2 days ago".
    #[serde(default, alias = "_time_text", deserialize_with = "null_as_default")]
    pub time_text: String,
}

/// A post on the forum board listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumPost {
    /// Board index number (`idxno`).
    pub id: String,
    /// Title as scraped, including any trailing `(N)` comment counter.
    pub title: String,
    pub url: String,
    pub author: String,
    /// `YYYY-MM-DD`, empty when no date cell was found.
    pub date: String,
    pub views: u64,
    pub comment_count: u64,
    pub preview: String,
}

/// A ranked entry in the trending snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingItem {
    #[serde(rename = "type")]
    pub item_type: String,
    pub id: String,
    pub title: String,
    pub url: String,
    pub view_count: u64,
    /// Views gained since the previous run; 0 without a usable baseline.
    pub view_delta: i64,
    pub comment_count: usize,
    pub channel: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hot: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YoutubeSnapshot {
    pub collected_at: String,
    pub videos: Vec<Video>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForumSnapshot {
    pub collected_at: String,
    pub posts: Vec<ForumPost>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingSnapshot {
    pub collected_at: String,
    pub items: Vec<TrendingItem>,
}

/// Deserialize `null` the same way as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_reads_time_text_alias_and_nulls() {
        let comment: Comment = serde_json::from_str(
            r#"{"author": "@viewer", "text": "좋아요", "timestamp": null, "like_count": 3, "_time_text": "1일 전"}"#,
        )
        .unwrap();

        assert_eq!(comment.author, "@viewer");
        assert_eq!(comment.text, "좋아요");
        assert_eq!(comment.timestamp, 0);
        assert_eq!(comment.like_count, 3);
        assert_eq!(comment.time_text, "1일 전");
    }

    #[test]
    fn test_hot_flag_omitted_when_false() {
        let mut item = TrendingItem {
            item_type: "youtube".to_string(),
            id: "abc".to_string(),
            title: "t".to_string(),
            url: "u".to_string(),
            view_count: 1,
            view_delta: 0,
            comment_count: 0,
            channel: String::new(),
            hot: false,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("hot").is_none());
        assert_eq!(json["type"], "youtube");

        item.hot = true;
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["hot"], true);
    }

    #[test]
    fn test_set_comments_updates_count() {
        let mut video: Video = serde_json::from_str(
            r#"{"id": "v1", "title": "t", "url": "u", "channel": "c", "channel_id": "UC1", "view_count": null}"#,
        )
        .unwrap();
        assert_eq!(video.view_count, 0);

        video.set_comments(vec![Comment::default(), Comment::default()]);
        assert_eq!(video.comment_count, 2);
    }
}
