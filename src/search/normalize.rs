//! Maps backend items onto the uniform [`SearchResult`] shape.
//!
//! This is the only place that knows about backend key names.

use crate::models::SearchResult;

use super::RawResult;

const TITLE_KEYS: &[&str] = &["title"];
const URL_KEYS: &[&str] = &["link", "url", "href"];
const DESCRIPTION_KEYS: &[&str] = &["body", "desc"];

/// Normalizes a raw backend item.
///
/// Each field takes the first non-empty value among its aliases, in order.
pub fn normalize(raw: &RawResult) -> SearchResult {
    SearchResult {
        title: first_present(raw, TITLE_KEYS),
        url: first_present(raw, URL_KEYS),
        description: first_present(raw, DESCRIPTION_KEYS),
    }
}

fn first_present(raw: &RawResult, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| raw.get(key))
        .find(|value| !value.is_empty())
        .map(str::to_string)
}
