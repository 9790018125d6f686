//! Context block assembly for the answer prompt.

use crate::models::SearchResult;

const NO_TITLE: &str = "(no title)";
const NO_URL: &str = "(no url)";

/// Formats one result as `[index] title\nurl\ndescription`.
pub fn format_source(index: usize, result: &SearchResult) -> String {
    format!(
        "[{}] {}\n{}\n{}",
        index,
        result.title().unwrap_or(NO_TITLE),
        result.url().unwrap_or(NO_URL),
        result.description().unwrap_or(""),
    )
}

/// Builds the numbered context from results in order, 1-based, separated by
/// blank lines.
pub fn format_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, result)| format_source(i + 1, result))
        .collect::<Vec<_>>()
        .join("\n\n")
}
