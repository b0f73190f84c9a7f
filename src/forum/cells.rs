//! Classification of the loose text cells of a board listing row.
//!
//! A listing row flattens to tokens like
//! `["NEW", "도로 포장 언제 하나요 (3)", "주민", "2024-05-01", "152"]`.
//! Each predicate below looks at one token in isolation; [`classify_cells`]
//! applies them in order to pick the date, the view count and the author.

/// Badges the board renders next to titles.
const BADGES: &[&str] = &["HOT", "NEW"];

/// Fields recovered from a row. Missing fields stay empty / zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellFields {
    pub author: String,
    pub date: String,
    pub views: u64,
}

/// `YYYY-MM-DD`-shaped: ten characters with exactly two hyphens.
#[must_use]
pub fn is_date_token(token: &str) -> bool {
    token.chars().count() == 10 && token.matches('-').count() == 2
}

fn is_all_digits(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

/// A purely numeric token greater than zero.
#[must_use]
pub fn view_count_token(token: &str) -> Option<u64> {
    if !is_all_digits(token) {
        return None;
    }
    token.parse::<u64>().ok().filter(|&n| n > 0)
}

#[must_use]
pub fn is_badge(token: &str) -> bool {
    BADGES.contains(&token)
}

/// Whether `token` can be the author given what else was recognised in the row.
#[must_use]
pub fn is_author_candidate(token: &str, title: &str, date: &str, views: u64) -> bool {
    if token == title || is_badge(token) || token == date || token == views.to_string() {
        return false;
    }
    let len = token.chars().count();
    len > 1 && len < 20 && !is_all_digits(token) && !token.contains('-')
}

/// Pick date, view count and author out of a row's tokens.
///
/// Later date and view-count tokens win over earlier ones; the author is the
/// first token that survives [`is_author_candidate`].
#[must_use]
pub fn classify_cells<S: AsRef<str>>(tokens: &[S], title: &str) -> CellFields {
    let mut fields = CellFields::default();

    for token in tokens {
        let token = token.as_ref().trim();
        if is_date_token(token) {
            fields.date = token.to_string();
        } else if let Some(views) = view_count_token(token) {
            fields.views = views;
        }
    }

    if let Some(author) = tokens
        .iter()
        .map(|t| t.as_ref().trim())
        .find(|t| is_author_candidate(t, title, &fields.date, fields.views))
    {
        fields.author = author.to_string();
    }

    fields
}
