//! Buzz collector library.
//!
//! A batch job that snapshots YouTube shorts comments from local broadcaster
//! channels and posts from the Okcheon News opinion board, then ranks the
//! videos by view growth since the previous run.

pub mod config;
pub mod constants;
pub mod forum;
pub mod models;
pub mod pipeline;
pub mod snapshot;
pub mod trending;
pub mod youtube;
