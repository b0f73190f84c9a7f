use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use super::cells::classify_cells;
use crate::models::ForumPost;

/// Text the board shows in place of a removed post.
const DELETED_POST_MARKER: &str = "삭제된 게시글";

static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table tr").expect("Invalid selector"));
static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("Invalid selector"));
static COMMENT_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([0-9]+)\)\s*$").expect("Invalid regex"));

/// Concatenated text of `element` with each text node trimmed.
pub(crate) fn stripped_text(element: &ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

/// A row's text split into cell tokens.
fn row_tokens(row: &ElementRef<'_>) -> Vec<String> {
    row.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("|")
        .split('|')
        .map(|t| t.trim().to_string())
        .collect()
}

/// Board index number from a post link such as `view.html?idxno=123&table=bbs_1`.
fn post_id_from_href(href: &str) -> Option<String> {
    if !href.contains("idxno=") {
        return None;
    }
    href.rsplit("idxno=")
        .next()
        .and_then(|rest| rest.split('&').next())
        .map(ToString::to_string)
}

/// Comment counter from a trailing `(N)` in the title, 0 when absent.
#[must_use]
pub fn comment_count_from_title(title: &str) -> u64 {
    COMMENT_COUNT
        .captures(title)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Absolute post URL: `href` itself when already absolute, else `base_url` + `href`.
#[must_use]
pub fn absolute_post_url(href: &str, base_url: &str) -> String {
    match Url::parse(href) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => href.to_string(),
        _ => format!("{base_url}{href}"),
    }
}

fn parse_row(row: &ElementRef<'_>, base_url: &str) -> Option<ForumPost> {
    let link = row.select(&LINK_SELECTOR).next()?;
    let href = link.value().attr("href")?;
    let id = post_id_from_href(href)?;

    let title = stripped_text(&link);
    if title.chars().count() < 2 {
        return None;
    }

    if row.text().collect::<String>().contains(DELETED_POST_MARKER) {
        debug!(id = %id, "Skipping deleted post");
        return None;
    }

    let fields = classify_cells(&row_tokens(row), &title);

    Some(ForumPost {
        comment_count: comment_count_from_title(&title),
        url: absolute_post_url(href, base_url),
        id,
        title,
        author: fields.author,
        date: fields.date,
        views: fields.views,
        preview: String::new(),
    })
}

/// Extract post rows from a board listing page, in page order.
///
/// Rows without a post link, with a too-short title, or marked deleted are
/// skipped. Duplicates are kept; see [`dedupe_posts`].
#[must_use]
pub fn parse_listing(html: &str, base_url: &str) -> Vec<ForumPost> {
    let document = Html::parse_document(html);
    document
        .select(&ROW_SELECTOR)
        .filter_map(|row| parse_row(&row, base_url))
        .collect()
}

/// Drop posts without an id, keep the first post per id, then cap to `max`.
#[must_use]
pub fn dedupe_posts(posts: Vec<ForumPost>, max: usize) -> Vec<ForumPost> {
    let mut seen = HashSet::new();
    posts
        .into_iter()
        .filter(|p| !p.id.is_empty() && seen.insert(p.id.clone()))
        .take(max)
        .collect()
}
