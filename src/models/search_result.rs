use serde::{Deserialize, Serialize};

/// A single web search hit in normalized form.
///
/// Every field is optional because backends do not guarantee any of them.
/// Results carry no identity beyond their position in the list returned by
/// the search provider, which preserves the backend's relevance order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Page title
    pub title: Option<String>,
    /// Page URL
    pub url: Option<String>,
    /// Snippet or description text
    pub description: Option<String>,
}

impl SearchResult {
    /// Creates a result with all three fields present.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            url: Some(url.into()),
            description: Some(description.into()),
        }
    }

    /// Returns the title, if any.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the URL, if any.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Returns the description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_populates_every_field() {
        let result = SearchResult::new("Rust", "https://www.rust-lang.org/", "A language");
        assert_eq!(result.title(), Some("Rust"));
        assert_eq!(result.url(), Some("https://www.rust-lang.org/"));
        assert_eq!(result.description(), Some("A language"));
    }

    #[test]
    fn default_has_no_fields() {
        let result = SearchResult::default();
        assert!(result.title().is_none());
        assert!(result.url().is_none());
        assert!(result.description().is_none());
    }

    #[test]
    fn serializes_missing_fields_as_null() {
        let result = SearchResult {
            title: Some("Only a title".to_string()),
            url: None,
            description: None,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["title"], "Only a title");
        assert!(json["url"].is_null());
        assert!(json["description"].is_null());
    }
}
