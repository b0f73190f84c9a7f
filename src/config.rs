use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Channels collected when `YOUTUBE_CHANNELS` is not set.
pub const DEFAULT_CHANNELS: &[&str] = &[
    "UCFLTNsOlzlbAD18DrSREuMQ", // MBC Chungbuk NEWS
    "UCKvnHmqJvQQ9osEO1qRz9nA", // Hello! MBC Chungbuk
];

pub const DEFAULT_FORUM_LIST_URL: &str = "http://www.okinews.com/bbs/list.html?table=bbs_1";
pub const DEFAULT_FORUM_BASE_URL: &str = "http://www.okinews.com/bbs/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("failed to parse {name} as boolean: {value}")]
    ParseBool { name: String, value: String },
}

/// Collector configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Output
    pub data_dir: PathBuf,

    // YouTube
    pub channels: Vec<String>,
    pub yt_dlp_command: Vec<String>,
    pub listing_timeout: Duration,
    pub comments_timeout: Duration,

    // Forum
    pub forum_list_url: String,
    pub forum_base_url: String,
    pub forum_list_timeout: Duration,
    pub forum_detail_timeout: Duration,

    pub limits: Limits,

    /// Exit non-zero when any stage ends degraded.
    pub strict_exit: bool,
}

/// Caps applied at each stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub videos_per_channel: usize,
    pub max_videos: usize,
    pub comments_per_video: usize,
    pub max_posts: usize,
    pub preview_posts: usize,
    pub trending_items: usize,
    pub hot_items: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            videos_per_channel: 10,
            max_videos: 20,
            comments_per_video: 20,
            max_posts: 30,
            preview_posts: 10,
            trending_items: 10,
            hot_items: 3,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            data_dir: PathBuf::from(env_or_default("DATA_DIR", "./data")),

            channels: optional_env("YOUTUBE_CHANNELS").map_or_else(
                || DEFAULT_CHANNELS.iter().map(ToString::to_string).collect(),
                |v| parse_list(&v, ','),
            ),
            yt_dlp_command: parse_list(&env_or_default("YT_DLP_COMMAND", "yt-dlp"), ' '),
            listing_timeout: Duration::from_secs(parse_env_u64("YT_DLP_LISTING_TIMEOUT_SECS", 120)?),
            comments_timeout: Duration::from_secs(parse_env_u64("YT_DLP_COMMENTS_TIMEOUT_SECS", 60)?),

            forum_list_url: env_or_default("FORUM_LIST_URL", DEFAULT_FORUM_LIST_URL),
            forum_base_url: env_or_default("FORUM_BASE_URL", DEFAULT_FORUM_BASE_URL),
            forum_list_timeout: Duration::from_secs(parse_env_u64("FORUM_LIST_TIMEOUT_SECS", 15)?),
            forum_detail_timeout: Duration::from_secs(parse_env_u64("FORUM_DETAIL_TIMEOUT_SECS", 10)?),

            limits: Limits::default(),

            strict_exit: parse_env_bool("STRICT_EXIT", false)?,
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channels.is_empty() {
            return Err(invalid("YOUTUBE_CHANNELS", "must list at least one channel id"));
        }
        if self.yt_dlp_command.is_empty() {
            return Err(invalid("YT_DLP_COMMAND", "cannot be empty"));
        }
        for (name, value) in [
            ("FORUM_LIST_URL", &self.forum_list_url),
            ("FORUM_BASE_URL", &self.forum_base_url),
        ] {
            if let Err(e) = url::Url::parse(value) {
                return Err(invalid(name, &format!("not a valid URL '{value}': {e}")));
            }
        }
        for (name, value) in [
            ("YT_DLP_LISTING_TIMEOUT_SECS", self.listing_timeout),
            ("YT_DLP_COMMENTS_TIMEOUT_SECS", self.comments_timeout),
            ("FORUM_LIST_TIMEOUT_SECS", self.forum_list_timeout),
            ("FORUM_DETAIL_TIMEOUT_SECS", self.forum_detail_timeout),
        ] {
            if value.is_zero() {
                return Err(invalid(name, "must be at least 1"));
            }
        }
        Ok(())
    }

    /// Configuration pointing at local placeholders, for tests.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            data_dir: PathBuf::from("./test-data"),
            channels: vec!["UC_test_channel".to_string()],
            yt_dlp_command: vec!["yt-dlp".to_string()],
            listing_timeout: Duration::from_secs(5),
            comments_timeout: Duration::from_secs(5),
            forum_list_url: "http://127.0.0.1:9/bbs/list.html?table=bbs_1".to_string(),
            forum_base_url: "http://127.0.0.1:9/bbs/".to_string(),
            forum_list_timeout: Duration::from_secs(5),
            forum_detail_timeout: Duration::from_secs(5),
            limits: Limits::default(),
            strict_exit: false,
        }
    }
}

fn invalid(name: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_string(),
        message: message.to_string(),
    }
}

fn parse_list(value: &str, sep: char) -> Vec<String> {
    value
        .split(sep)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    optional_env(name).unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_bool(name: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::ParseBool {
                name: name.to_string(),
                value: val,
            }),
        },
        _ => Ok(default),
    }
}
