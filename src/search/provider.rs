//! Search provider: validates queries and collects normalized results.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::SearchResult;

use super::duckduckgo::DuckDuckGoBackend;
use super::normalize::normalize;
use super::{SafeSearch, SearchBackend, SearchError, TimeLimit};

/// Default cap on the number of collected results.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Parameters for a single search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub max_results: usize,
    pub safesearch: SafeSearch,
    pub timelimit: TimeLimit,
}

impl SearchOptions {
    /// Creates options with the given result cap and default filters.
    pub fn new(max_results: usize) -> Self {
        Self {
            max_results,
            ..Self::default()
        }
    }

    pub fn safesearch(mut self, safesearch: SafeSearch) -> Self {
        self.safesearch = safesearch;
        self
    }

    pub fn timelimit(mut self, timelimit: TimeLimit) -> Self {
        self.timelimit = timelimit;
        self
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            safesearch: SafeSearch::default(),
            timelimit: TimeLimit::default(),
        }
    }
}

/// Builder for constructing `SearchProvider` instances.
#[derive(Default)]
pub struct SearchProviderBuilder {
    backend: Option<Arc<dyn SearchBackend>>,
}

impl SearchProviderBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search backend to query.
    pub fn backend(mut self, backend: Arc<dyn SearchBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Builds the `SearchProvider`.
    ///
    /// Returns [`SearchError::DependencyUnavailable`] if no backend was set.
    pub fn build(self) -> Result<SearchProvider, SearchError> {
        let backend = self.backend.ok_or_else(|| {
            SearchError::DependencyUnavailable("no search backend configured".to_string())
        })?;
        Ok(SearchProvider { backend })
    }
}

/// Queries a search backend and returns normalized results in backend order.
#[derive(Clone)]
pub struct SearchProvider {
    backend: Arc<dyn SearchBackend>,
}

impl SearchProvider {
    /// Creates a provider over the given backend.
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    /// Creates a provider backed by DuckDuckGo with default settings.
    pub fn duckduckgo() -> Result<Self, SearchError> {
        let backend = DuckDuckGoBackend::builder().build()?;
        Ok(Self::new(Arc::new(backend)))
    }

    /// Searches for `query` and returns at most `options.max_results` results.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidArgument`] for a blank query, before any
    /// backend call, and propagates [`SearchError::DependencyUnavailable`].
    /// Transient backend failures are logged and whatever was collected up to
    /// that point is returned.
    pub fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchResult>, SearchError> {
        if query.trim().is_empty() {
            return Err(SearchError::InvalidArgument(
                "query must contain searchable text".to_string(),
            ));
        }

        let mut results = Vec::with_capacity(options.max_results.min(DEFAULT_MAX_RESULTS));
        if options.max_results == 0 {
            return Ok(results);
        }

        debug!(
            query,
            max_results = options.max_results,
            safesearch = %options.safesearch,
            timelimit = %options.timelimit,
            "starting web search"
        );

        let stream = match self
            .backend
            .text(query, options.safesearch, options.timelimit)
        {
            Ok(stream) => stream,
            Err(e) if e.is_transient() => {
                warn!(error = %e, "web search failed before returning results");
                return Ok(results);
            }
            Err(e) => return Err(e),
        };

        for item in stream {
            match item {
                Ok(raw) => {
                    results.push(normalize(&raw));
                    if results.len() >= options.max_results {
                        break;
                    }
                }
                Err(e) if e.is_transient() => {
                    warn!(
                        error = %e,
                        collected = results.len(),
                        "web search failed mid-stream, returning partial results"
                    );
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        debug!(count = results.len(), "web search complete");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::search::{RawResult, RawResults};

    enum MockItem {
        Item(RawResult),
        Fail(&'static str),
    }

    struct MockBackend {
        items: Vec<MockItem>,
        calls: AtomicUsize,
        pulled: AtomicUsize,
    }

    impl MockBackend {
        fn new(items: Vec<MockItem>) -> Self {
            Self {
                items,
                calls: AtomicUsize::new(0),
                pulled: AtomicUsize::new(0),
            }
        }

        fn with_titles(count: usize) -> Self {
            Self::new(
                (1..=count)
                    .map(|i| {
                        MockItem::Item(
                            RawResult::new()
                                .with("title", format!("Result {i}"))
                                .with("href", format!("https://example.com/{i}"))
                                .with("body", format!("Body {i}")),
                        )
                    })
                    .collect(),
            )
        }
    }

    impl SearchBackend for MockBackend {
        fn text<'a>(
            &'a self,
            _query: &str,
            _safesearch: SafeSearch,
            _timelimit: TimeLimit,
        ) -> Result<RawResults<'a>, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(self.items.iter().map(move |item| {
                self.pulled.fetch_add(1, Ordering::SeqCst);
                match item {
                    MockItem::Item(raw) => Ok(raw.clone()),
                    MockItem::Fail(msg) => Err(SearchError::Http(msg.to_string())),
                }
            })))
        }
    }

    struct UnreachableBackend;

    impl SearchBackend for UnreachableBackend {
        fn text<'a>(
            &'a self,
            _query: &str,
            _safesearch: SafeSearch,
            _timelimit: TimeLimit,
        ) -> Result<RawResults<'a>, SearchError> {
            Err(SearchError::Timeout("connect timed out".to_string()))
        }
    }

    #[test]
    fn returns_first_k_results_in_backend_order() {
        let backend = Arc::new(MockBackend::with_titles(5));
        let provider = SearchProvider::new(backend.clone());

        let results = provider
            .search("rust ownership", &SearchOptions::new(3))
            .unwrap();

        let titles: Vec<_> = results.iter().filter_map(|r| r.title()).collect();
        assert_eq!(titles, vec!["Result 1", "Result 2", "Result 3"]);
    }

    #[test]
    fn stops_pulling_once_enough_results_collected() {
        let backend = Arc::new(MockBackend::with_titles(5));
        let provider = SearchProvider::new(backend.clone());

        provider.search("rust", &SearchOptions::new(2)).unwrap();

        assert_eq!(backend.pulled.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn returns_all_results_when_backend_has_fewer_than_k() {
        let provider = SearchProvider::new(Arc::new(MockBackend::with_titles(2)));
        let results = provider.search("rust", &SearchOptions::new(10)).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn blank_query_rejected_before_backend_call() {
        let backend = Arc::new(MockBackend::with_titles(3));
        let provider = SearchProvider::new(backend.clone());

        for query in ["", "   ", "\n\t"] {
            let result = provider.search(query, &SearchOptions::default());
            assert!(matches!(result, Err(SearchError::InvalidArgument(_))));
        }
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn zero_max_results_skips_backend() {
        let backend = Arc::new(MockBackend::with_titles(3));
        let provider = SearchProvider::new(backend.clone());

        let results = provider.search("rust", &SearchOptions::new(0)).unwrap();

        assert!(results.is_empty());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn mid_stream_failure_returns_partial_results() {
        let backend = MockBackend::new(vec![
            MockItem::Item(RawResult::new().with("title", "first")),
            MockItem::Fail("connection reset"),
            MockItem::Item(RawResult::new().with("title", "never seen")),
        ]);
        let provider = SearchProvider::new(Arc::new(backend));

        let results = provider.search("rust", &SearchOptions::new(5)).unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title(), Some("first"));
    }

    #[test]
    fn failure_before_first_item_returns_empty() {
        let provider = SearchProvider::new(Arc::new(UnreachableBackend));
        let results = provider.search("rust", &SearchOptions::new(5)).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn results_are_normalized() {
        let backend = MockBackend::new(vec![MockItem::Item(
            RawResult::new()
                .with("title", "Docs")
                .with("link", "https://doc.rust-lang.org")
                .with("desc", "The book"),
        )]);
        let provider = SearchProvider::new(Arc::new(backend));

        let results = provider.search("rust", &SearchOptions::new(1)).unwrap();
        assert_eq!(
            results[0],
            SearchResult::new("Docs", "https://doc.rust-lang.org", "The book")
        );
    }

    #[test]
    fn builder_without_backend_is_dependency_unavailable() {
        let result = SearchProviderBuilder::new().build();
        assert!(matches!(result, Err(SearchError::DependencyUnavailable(_))));
    }

    #[test]
    fn builder_with_backend_succeeds() {
        let provider = SearchProviderBuilder::new()
            .backend(Arc::new(MockBackend::with_titles(1)))
            .build()
            .unwrap();
        assert_eq!(provider.search("q", &SearchOptions::new(1)).unwrap().len(), 1);
    }

    #[test]
    fn options_builder_methods() {
        let options = SearchOptions::new(4)
            .safesearch(SafeSearch::Strict)
            .timelimit(TimeLimit::Week);
        assert_eq!(options.max_results, 4);
        assert_eq!(options.safesearch, SafeSearch::Strict);
        assert_eq!(options.timelimit, TimeLimit::Week);
    }
}
