//! Reading, writing and rotating the JSON snapshot files.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Offset, SecondsFormat, Utc};
use serde::Serialize;
use tracing::debug;

use crate::constants::KST_OFFSET_SECS;

/// Current time in Korea Standard Time.
#[must_use]
pub fn now_kst() -> DateTime<FixedOffset> {
    let kst = FixedOffset::east_opt(KST_OFFSET_SECS).unwrap_or_else(|| Utc.fix());
    Utc::now().with_timezone(&kst)
}

/// Timestamp stamped into every snapshot, e.g. `2024-05-01T09:30:00.123456+09:00`.
#[must_use]
pub fn collected_at() -> String {
    format_timestamp(&now_kst())
}

fn format_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Write `value` as pretty-printed JSON, replacing any existing file.
///
/// Non-ASCII text (Korean titles and comments) is written as literal UTF-8.
///
/// # Errors
///
/// Returns an error if serialization fails or the file cannot be written.
pub async fn write_snapshot<T: Serialize + Sync>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    let json = serde_json::to_string_pretty(value).context("Failed to serialize snapshot")?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write snapshot: {}", path.display()))?;

    debug!(path = %path.display(), "Snapshot written");
    Ok(())
}

/// Copy `current` over `previous` so the next run can diff against it.
///
/// Returns `false` without touching `previous` when `current` does not exist.
/// The copy is not atomic.
///
/// # Errors
///
/// Returns an error if the copy fails.
pub async fn rotate(current: &Path, previous: &Path) -> Result<bool> {
    if !tokio::fs::try_exists(current).await.unwrap_or(false) {
        debug!(path = %current.display(), "Nothing to rotate");
        return Ok(false);
    }

    tokio::fs::copy(current, previous).await.with_context(|| {
        format!(
            "Failed to copy {} to {}",
            current.display(),
            previous.display()
        )
    })?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_format_timestamp_has_kst_offset() {
        let kst = FixedOffset::east_opt(KST_OFFSET_SECS).unwrap();
        let ts = kst.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        assert_eq!(format_timestamp(&ts), "2024-05-01T09:30:00.000000+09:00");
    }

    #[test]
    fn test_collected_at_ends_with_offset() {
        assert!(collected_at().ends_with("+09:00"));
    }

    #[tokio::test]
    async fn test_write_snapshot_keeps_non_ascii() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("out.json");

        write_snapshot(&path, &serde_json::json!({"title": "옥천신문"}))
            .await
            .unwrap();

        let text = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(text.contains("옥천신문"));
        assert!(text.contains("\n  \"title\""));
    }

    #[tokio::test]
    async fn test_rotate_copies_bytes() {
        let dir = TempDir::new().unwrap();
        let current = dir.path().join("youtube.json");
        let previous = dir.path().join("youtube_prev.json");

        assert!(!rotate(&current, &previous).await.unwrap());
        assert!(!previous.exists());

        tokio::fs::write(&current, b"{\"videos\": []}").await.unwrap();
        assert!(rotate(&current, &previous).await.unwrap());
        assert_eq!(
            tokio::fs::read(&current).await.unwrap(),
            tokio::fs::read(&previous).await.unwrap()
        );
    }
}
