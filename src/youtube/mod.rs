//! YouTube shorts and comment collection through yt-dlp.

mod collector;
mod source;
mod ytdlp;

pub use collector::{
    collect_videos, parse_comment_output, parse_listing_output, save_youtube_snapshot,
    VideoCollection,
};
pub use source::{CommentFetcher, ListingFetcher};
pub use ytdlp::{YtDlp, YtDlpError};
