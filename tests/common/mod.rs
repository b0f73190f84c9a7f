//! Shared fakes and fixtures for integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use buzz_collector::forum::PageFetcher;
use buzz_collector::youtube::{CommentFetcher, ListingFetcher};

/// In-memory stand-in for yt-dlp.
///
/// Listings are keyed by channel tab URL, comments by video id. Anything not
/// registered behaves like a non-zero exit.
#[derive(Default)]
pub struct FakeYoutube {
    pub listings: HashMap<String, String>,
    pub comments: HashMap<String, String>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeYoutube {
    pub fn with_listing(mut self, channel_id: &str, tab: &str, output: String) -> Self {
        self.listings.insert(
            format!("https://www.youtube.com/channel/{channel_id}/{tab}"),
            output,
        );
        self
    }

    pub fn with_comments(mut self, video_id: &str, output: String) -> Self {
        self.comments.insert(video_id.to_string(), output);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ListingFetcher for FakeYoutube {
    async fn fetch_listing(&self, url: &str, limit: usize) -> Result<String> {
        self.calls.lock().unwrap().push(format!("listing {url}"));
        let output = self
            .listings
            .get(url)
            .ok_or_else(|| anyhow::anyhow!("yt-dlp exited with exit status: 1"))?;
        // Emulate --playlist-end
        Ok(output.lines().take(limit).collect::<Vec<_>>().join("\n"))
    }
}

#[async_trait]
impl CommentFetcher for FakeYoutube {
    async fn fetch_comments(&self, video_id: &str, _max_comments: usize) -> Result<String> {
        self.calls.lock().unwrap().push(format!("comments {video_id}"));
        self.comments
            .get(video_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("yt-dlp exited with exit status: 1"))
    }
}

/// Page fetcher that serves nothing; used when a test does not touch the forum.
pub struct NoPages;

#[async_trait]
impl PageFetcher for NoPages {
    async fn fetch_page(&self, url: &str, _timeout: Duration) -> Result<String> {
        anyhow::bail!("no page for {url}")
    }
}

/// One `--flat-playlist --dump-json` line.
pub fn listing_line(id: &str, view_count: u64) -> String {
    serde_json::json!({
        "id": id,
        "title": format!("쇼츠 {id}"),
        "url": format!("https://www.youtube.com/shorts/{id}"),
        "channel": "MBC충북NEWS",
        "view_count": view_count,
        "duration": 42,
    })
    .to_string()
}

pub fn listing_output(videos: &[(&str, u64)]) -> String {
    videos
        .iter()
        .map(|(id, views)| listing_line(id, *views))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Comment dump with `count` comments.
pub fn comment_output(video_id: &str, count: usize) -> String {
    let comments: Vec<_> = (0..count)
        .map(|i| {
            serde_json::json!({
                "author": format!("@viewer{i}"),
                "text": format!("댓글 {i}"),
                "timestamp": 1_714_500_000 + i,
                "like_count": i,
                "_time_text": "1일 전",
            })
        })
        .collect();
    serde_json::json!({"id": video_id, "comments": comments}).to_string()
}

/// A board listing row.
pub fn listing_row(id: u32, title: &str, author: &str, date: &str, views: u32) -> String {
    format!(
        r#"<tr>
            <td>{id}</td>
            <td><a href="view.html?idxno={id}&table=bbs_1">{title}</a></td>
            <td>{author}</td>
            <td>{date}</td>
            <td>{views}</td>
        </tr>"#
    )
}

pub fn listing_page(rows: &[String]) -> String {
    format!(
        r#"<html><body><table class="bbs-list">
            <tr><th>번호</th><th>제목</th><th>글쓴이</th><th>날짜</th><th>조회</th></tr>
            {}
        </table></body></html>"#,
        rows.join("\n")
    )
}

pub fn detail_page(body: &str) -> String {
    format!(r#"<html><body><div class="view-content">{body}</div></body></html>"#)
}
