use std::process::Stdio;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use super::source::{CommentFetcher, ListingFetcher};
use crate::config::Config;

#[derive(Debug, Error)]
pub enum YtDlpError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("yt-dlp timed out after {0:?}")]
    Timeout(Duration),
    #[error("yt-dlp exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("yt-dlp command is empty")]
    EmptyCommand,
}

/// Runs yt-dlp as a subprocess for listings and comments.
#[derive(Debug, Clone)]
pub struct YtDlp {
    /// Program followed by any leading arguments, e.g. `["python3", "-m", "yt_dlp"]`.
    command: Vec<String>,
    listing_timeout: Duration,
    comments_timeout: Duration,
}

impl YtDlp {
    #[must_use]
    pub fn new(command: Vec<String>, listing_timeout: Duration, comments_timeout: Duration) -> Self {
        Self {
            command,
            listing_timeout,
            comments_timeout,
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.yt_dlp_command.clone(),
            config.listing_timeout,
            config.comments_timeout,
        )
    }

    /// Run the command with `args` appended and return its stdout.
    async fn run(&self, args: &[String], timeout: Duration) -> Result<String, YtDlpError> {
        let (program, leading) = self.command.split_first().ok_or(YtDlpError::EmptyCommand)?;

        debug!(program = %program, ?args, "Running yt-dlp");

        let child = Command::new(program)
            .args(leading)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| YtDlpError::Spawn {
                program: program.clone(),
                source,
            })?;

        // Dropping the future on timeout drops the child, which kills it.
        let output = tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|_| YtDlpError::Timeout(timeout))?
            .map_err(|source| YtDlpError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(YtDlpError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn listing_args(url: &str, limit: usize) -> Vec<String> {
    vec![
        "--flat-playlist".to_string(),
        "--dump-json".to_string(),
        "--playlist-end".to_string(),
        limit.to_string(),
        "--no-warnings".to_string(),
        url.to_string(),
    ]
}

fn comment_args(video_id: &str, max_comments: usize) -> Vec<String> {
    vec![
        "--write-comments".to_string(),
        "--skip-download".to_string(),
        "--dump-json".to_string(),
        "--extractor-args".to_string(),
        format!("youtube:max_comments={max_comments}"),
        "--no-warnings".to_string(),
        format!("https://www.youtube.com/watch?v={video_id}"),
    ]
}

#[async_trait]
impl ListingFetcher for YtDlp {
    async fn fetch_listing(&self, url: &str, limit: usize) -> Result<String> {
        Ok(self.run(&listing_args(url, limit), self.listing_timeout).await?)
    }
}

#[async_trait]
impl CommentFetcher for YtDlp {
    async fn fetch_comments(&self, video_id: &str, max_comments: usize) -> Result<String> {
        Ok(self
            .run(&comment_args(video_id, max_comments), self.comments_timeout)
            .await?)
    }
}
