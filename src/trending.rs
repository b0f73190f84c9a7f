//! Ranks collected videos by view growth since the previous run.
//!
//! The baseline is `youtube_prev.json`, a copy of the last run's
//! `youtube.json` taken after that run's ranking was written.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::Limits;
use crate::constants::{TRENDING_SNAPSHOT_FILE, YOUTUBE_PREV_SNAPSHOT_FILE, YOUTUBE_SNAPSHOT_FILE};
use crate::models::{null_as_default, TrendingItem, TrendingSnapshot, Video};
use crate::snapshot::{collected_at, rotate, write_snapshot};

#[derive(Debug, Deserialize)]
struct PreviousSnapshot {
    #[serde(default)]
    videos: Vec<PreviousVideo>,
}

#[derive(Debug, Deserialize)]
struct PreviousVideo {
    id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    view_count: u64,
}

/// Outcome of a trending run.
#[derive(Debug, Default)]
pub struct TrendingReport {
    pub items: Vec<TrendingItem>,
    /// Whether `youtube.json` was copied to `youtube_prev.json`.
    pub rotated: bool,
}

/// Read the previous run's view counts keyed by video id.
///
/// Any problem reading or parsing the file means no history.
pub async fn load_previous_views(path: &Path) -> HashMap<String, u64> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "No previous snapshot");
            return HashMap::new();
        }
    };

    match serde_json::from_str::<PreviousSnapshot>(&text) {
        Ok(prev) => prev
            .videos
            .into_iter()
            .map(|v| (v.id, v.view_count))
            .collect(),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Ignoring unreadable previous snapshot");
            HashMap::new()
        }
    }
}

/// View growth of `video` against the baseline.
///
/// Videos with no baseline, or a baseline of 0, count as not growing.
#[must_use]
pub fn view_delta(video: &Video, previous: &HashMap<String, u64>) -> i64 {
    match previous.get(&video.id) {
        Some(&prev) if prev != 0 => video.view_count as i64 - prev as i64,
        _ => 0,
    }
}

/// Rank `videos` by `(view_delta, view_count)` descending and flag the leaders.
///
/// Ties keep collection order. The first `limits.hot_items` entries are hot;
/// the list is cut to `limits.trending_items`.
#[must_use]
pub fn compute_trending(
    videos: &[Video],
    previous: &HashMap<String, u64>,
    limits: &Limits,
) -> Vec<TrendingItem> {
    let mut items: Vec<TrendingItem> = videos
        .iter()
        .map(|v| TrendingItem {
            item_type: "youtube".to_string(),
            id: v.id.clone(),
            title: v.title.clone(),
            url: v.url.clone(),
            view_count: v.view_count,
            view_delta: view_delta(v, previous),
            comment_count: v.comment_count,
            channel: v.channel.clone(),
            hot: false,
        })
        .collect();

    items.sort_by(|a, b| {
        (b.view_delta, b.view_count).cmp(&(a.view_delta, a.view_count))
    });

    for item in items.iter_mut().take(limits.hot_items) {
        item.hot = true;
    }

    items.truncate(limits.trending_items);
    items
}

/// Rank `videos`, write `trending.json` and rotate the baseline.
///
/// `rotate_baseline` must be false when this run's `youtube.json` was not
/// saved; the file on disk then belongs to an older run or is truncated.
///
/// # Errors
///
/// Returns an error if the trending snapshot cannot be written or the
/// rotation copy fails. The baseline is left alone when the write fails.
pub async fn run_trending(
    data_dir: &Path,
    videos: &[Video],
    limits: &Limits,
    rotate_baseline: bool,
) -> Result<TrendingReport> {
    let prev_path = data_dir.join(YOUTUBE_PREV_SNAPSHOT_FILE);
    let previous = load_previous_views(&prev_path).await;

    let items = compute_trending(videos, &previous, limits);

    let snapshot = TrendingSnapshot {
        collected_at: collected_at(),
        items,
    };
    write_snapshot(&data_dir.join(TRENDING_SNAPSHOT_FILE), &snapshot)
        .await
        .context("Failed to save trending snapshot")?;

    let rotated = if rotate_baseline {
        rotate(&data_dir.join(YOUTUBE_SNAPSHOT_FILE), &prev_path)
            .await
            .context("Failed to rotate previous YouTube snapshot")?
    } else {
        warn!("YouTube snapshot not saved this run, keeping previous baseline");
        false
    };

    info!(
        items = snapshot.items.len(),
        history_entries = previous.len(),
        rotated,
        "Trending saved"
    );

    Ok(TrendingReport {
        items: snapshot.items,
        rotated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: &str, view_count: u64) -> Video {
        Video {
            id: id.to_string(),
            title: format!("title {id}"),
            url: format!("https://youtube.com/shorts/{id}"),
            channel: "MBC충북".to_string(),
            channel_id: "UC1".to_string(),
            view_count,
            duration: Some(30u64.into()),
            upload_date: String::new(),
            comments: Vec::new(),
            comment_count: 0,
        }
    }

    fn history(entries: &[(&str, u64)]) -> HashMap<String, u64> {
        entries.iter().map(|(id, n)| ((*id).to_string(), *n)).collect()
    }

    #[test]
    fn test_delta_rules() {
        let previous = history(&[("A", 100), ("B", 0)]);

        assert_eq!(view_delta(&video("A", 150), &previous), 50);
        assert_eq!(view_delta(&video("B", 50), &previous), 0);
        assert_eq!(view_delta(&video("C", 10), &previous), 0);
    }

    #[test]
    fn test_negative_delta() {
        let previous = history(&[("A", 100)]);
        assert_eq!(view_delta(&video("A", 90), &previous), -10);
    }

    #[test]
    fn test_ranking_and_hot_flags() {
        let previous = history(&[("A", 100), ("B", 0)]);
        let videos = [video("C", 10), video("B", 50), video("A", 150)];

        let items = compute_trending(&videos, &previous, &Limits::default());

        let order: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(order, ["A", "B", "C"]);
        assert_eq!(items[0].view_delta, 50);
        assert!(items.iter().all(|i| i.hot));
        assert!(items.iter().all(|i| i.item_type == "youtube"));
    }

    #[test]
    fn test_only_top_three_hot_and_truncated_to_ten() {
        let videos: Vec<Video> = (0..15).map(|i| video(&format!("v{i}"), i * 10)).collect();

        let items = compute_trending(&videos, &HashMap::new(), &Limits::default());

        assert_eq!(items.len(), 10);
        assert_eq!(items[0].id, "v14");
        assert_eq!(items.iter().filter(|i| i.hot).count(), 3);
        assert!(items[..3].iter().all(|i| i.hot));
    }

    #[test]
    fn test_ties_keep_collection_order() {
        let videos = [video("first", 10), video("second", 10)];
        let items = compute_trending(&videos, &HashMap::new(), &Limits::default());
        assert_eq!(items[0].id, "first");
        assert_eq!(items[1].id, "second");
    }

    #[tokio::test]
    async fn test_load_previous_views_tolerates_bad_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("youtube_prev.json");

        assert!(load_previous_views(&path).await.is_empty());

        tokio::fs::write(&path, "{not json").await.unwrap();
        assert!(load_previous_views(&path).await.is_empty());

        tokio::fs::write(&path, r#"{"videos": [{"title": "no id"}]}"#)
            .await
            .unwrap();
        assert!(load_previous_views(&path).await.is_empty());

        tokio::fs::write(
            &path,
            r#"{"collected_at": "x", "videos": [{"id": "A", "view_count": 100}, {"id": "B", "view_count": null}]}"#,
        )
        .await
        .unwrap();
        let views = load_previous_views(&path).await;
        assert_eq!(views.get("A"), Some(&100));
        assert_eq!(views.get("B"), Some(&0));
    }

    #[tokio::test]
    async fn test_run_trending_keeps_baseline_when_told_not_to_rotate() {
        let dir = tempfile::TempDir::new().unwrap();
        let current = dir.path().join(YOUTUBE_SNAPSHOT_FILE);
        let prev = dir.path().join(YOUTUBE_PREV_SNAPSHOT_FILE);
        tokio::fs::write(&current, b"{\"videos\": [{\"id\": \"stale\"}]}")
            .await
            .unwrap();
        tokio::fs::write(&prev, b"{\"videos\": [{\"id\": \"A\", \"view_count\": 100}]}")
            .await
            .unwrap();

        let report = run_trending(dir.path(), &[video("A", 150)], &Limits::default(), false)
            .await
            .unwrap();

        assert!(!report.rotated);
        assert_eq!(report.items[0].view_delta, 50);
        assert_eq!(
            tokio::fs::read(&prev).await.unwrap(),
            b"{\"videos\": [{\"id\": \"A\", \"view_count\": 100}]}"
        );
        assert!(dir.path().join(TRENDING_SNAPSHOT_FILE).exists());
    }

    #[tokio::test]
    async fn test_run_trending_rotates_saved_snapshot() {
        let dir = tempfile::TempDir::new().unwrap();
        let current = dir.path().join(YOUTUBE_SNAPSHOT_FILE);
        tokio::fs::write(&current, b"{\"videos\": []}").await.unwrap();

        let report = run_trending(dir.path(), &[], &Limits::default(), true)
            .await
            .unwrap();

        assert!(report.rotated);
        assert_eq!(
            tokio::fs::read(dir.path().join(YOUTUBE_PREV_SNAPSHOT_FILE))
                .await
                .unwrap(),
            b"{\"videos\": []}"
        );
    }
}
