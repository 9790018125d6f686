//! DuckDuckGo HTML search backend.
//!
//! Uses the JavaScript-free endpoint at `https://html.duckduckgo.com/html/`.
//! Result pages are fetched on demand as the result stream is advanced; the
//! "Next" form embedded in each page carries the parameters for the following
//! page.

use std::collections::VecDeque;
use std::time::Duration;

use reqwest::header::ACCEPT_LANGUAGE;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace};
use url::Url;

use super::{RawResult, RawResults, SafeSearch, SearchBackend, SearchError, TimeLimit};

/// Default HTML search endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

const DEFAULT_REGION: &str = "wt-wt";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_PAGES: usize = 5;
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

type FormParams = Vec<(String, String)>;

/// Builder for constructing `DuckDuckGoBackend` instances.
#[derive(Debug, Default)]
pub struct DuckDuckGoBackendBuilder {
    endpoint: Option<String>,
    region: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    max_pages: Option<usize>,
}

impl DuckDuckGoBackendBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTML search endpoint (useful for pointing at a test server).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the region code (`kl` parameter), e.g. `us-en`.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets the per-page request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Caps the number of result pages fetched for one query.
    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Builds the backend.
    ///
    /// Returns [`SearchError::DependencyUnavailable`] if the endpoint is not a
    /// valid URL or the HTTP client cannot be constructed.
    pub fn build(self) -> Result<DuckDuckGoBackend, SearchError> {
        let endpoint = self.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        Url::parse(&endpoint).map_err(|e| {
            SearchError::DependencyUnavailable(format!("invalid endpoint {endpoint}: {e}"))
        })?;

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout.unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(
                self.user_agent
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            )
            .build()
            .map_err(|e| {
                SearchError::DependencyUnavailable(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(DuckDuckGoBackend {
            client,
            endpoint,
            region: self.region.unwrap_or_else(|| DEFAULT_REGION.to_string()),
            max_pages: self.max_pages.unwrap_or(DEFAULT_MAX_PAGES),
        })
    }
}

/// Scrapes DuckDuckGo's HTML results.
///
/// Emits raw items keyed `title`, `href` and `body`.
pub struct DuckDuckGoBackend {
    client: reqwest::blocking::Client,
    endpoint: String,
    region: String,
    max_pages: usize,
}

impl DuckDuckGoBackend {
    pub fn builder() -> DuckDuckGoBackendBuilder {
        DuckDuckGoBackendBuilder::new()
    }

    /// Returns the configured endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn initial_form(&self, query: &str, safesearch: SafeSearch, timelimit: TimeLimit) -> FormParams {
        vec![
            ("q".to_string(), query.to_string()),
            ("kl".to_string(), self.region.clone()),
            ("kp".to_string(), safesearch_code(safesearch).to_string()),
            ("df".to_string(), timelimit.code().to_string()),
        ]
    }

    fn fetch_page(&self, form: &FormParams) -> Result<ResultPage, SearchError> {
        trace!(endpoint = %self.endpoint, "fetching DuckDuckGo results page");

        let html = self
            .client
            .post(&self.endpoint)
            .form(form)
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()?
            .error_for_status()?
            .text()?;

        trace!(bytes = html.len(), "DuckDuckGo response received");
        parse_results_page(&html)
    }
}

impl SearchBackend for DuckDuckGoBackend {
    fn text<'a>(
        &'a self,
        query: &str,
        safesearch: SafeSearch,
        timelimit: TimeLimit,
    ) -> Result<RawResults<'a>, SearchError> {
        let first = self.initial_form(query, safesearch, timelimit);
        let sticky = vec![first[2].clone(), first[3].clone()];

        Ok(Box::new(ResultStream {
            backend: self,
            buffered: VecDeque::new(),
            next_form: Some(first),
            sticky,
            pages_fetched: 0,
        }))
    }
}

/// DuckDuckGo encodes safesearch as `kp`.
fn safesearch_code(safesearch: SafeSearch) -> &'static str {
    match safesearch {
        SafeSearch::Strict => "1",
        SafeSearch::Moderate => "-1",
        SafeSearch::Off => "-2",
    }
}

/// Iterator that fetches pages lazily.
struct ResultStream<'a> {
    backend: &'a DuckDuckGoBackend,
    buffered: VecDeque<RawResult>,
    next_form: Option<FormParams>,
    /// Filter parameters re-applied to every follow-up page.
    sticky: FormParams,
    pages_fetched: usize,
}

impl Iterator for ResultStream<'_> {
    type Item = Result<RawResult, SearchError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffered.pop_front() {
                return Some(Ok(item));
            }

            if self.pages_fetched >= self.backend.max_pages {
                return None;
            }
            let form = self.next_form.take()?;

            match self.backend.fetch_page(&form) {
                Ok(page) => {
                    self.pages_fetched += 1;
                    debug!(
                        page = self.pages_fetched,
                        count = page.results.len(),
                        "DuckDuckGo page parsed"
                    );
                    self.buffered.extend(page.results);
                    self.next_form = page.next_form.map(|mut next| {
                        for (key, value) in &self.sticky {
                            if !next.iter().any(|(k, _)| k == key) {
                                next.push((key.clone(), value.clone()));
                            }
                        }
                        next
                    });
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// One parsed HTML results page.
#[derive(Debug, Default)]
pub(crate) struct ResultPage {
    pub(crate) results: Vec<RawResult>,
    pub(crate) next_form: Option<FormParams>,
}

fn selector(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css).map_err(|e| SearchError::Parse(format!("invalid selector {css}: {e:?}")))
}

/// Parses a DuckDuckGo HTML page into raw items and the next-page form.
pub(crate) fn parse_results_page(html: &str) -> Result<ResultPage, SearchError> {
    let document = Html::parse_document(html);

    let result_sel = selector(
        ".result.results_links.results_links_deep:not(.result--ad), .web-result:not(.result--ad)",
    )?;
    let title_sel = selector(".result__a")?;
    let snippet_sel = selector(".result__snippet")?;

    let mut results = Vec::new();
    for element in document.select(&result_sel) {
        let Some(title_el) = element.select(&title_sel).next() else {
            continue;
        };

        let title = collect_text(title_el);
        if title.is_empty() {
            continue;
        }

        let Some(url) = title_el.value().attr("href").and_then(extract_url) else {
            continue;
        };

        let body = element
            .select(&snippet_sel)
            .next()
            .map(collect_text)
            .unwrap_or_default();

        results.push(
            RawResult::new()
                .with("title", title)
                .with("href", url)
                .with("body", body),
        );
    }

    Ok(ResultPage {
        results,
        next_form: parse_next_form(&document)?,
    })
}

fn collect_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Finds the pagination form whose submit button reads "Next".
fn parse_next_form(document: &Html) -> Result<Option<FormParams>, SearchError> {
    let form_sel = selector(".nav-link form")?;
    let input_sel = selector("input")?;

    for form in document.select(&form_sel) {
        let is_next = form.select(&input_sel).any(|input| {
            let input = input.value();
            input.attr("type") == Some("submit")
                && input
                    .attr("value")
                    .is_some_and(|v| v.trim().eq_ignore_ascii_case("next"))
        });
        if !is_next {
            continue;
        }

        let params: FormParams = form
            .select(&input_sel)
            .filter(|input| input.value().attr("type") == Some("hidden"))
            .filter_map(|input| {
                let name = input.value().attr("name")?;
                let value = input.value().attr("value").unwrap_or("");
                Some((name.to_string(), value.to_string()))
            })
            .collect();

        if !params.is_empty() {
            return Ok(Some(params));
        }
    }

    Ok(None)
}

/// Extracts the target URL from DuckDuckGo's redirect wrapper.
///
/// DDG wraps links like `//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com&rut=...`.
fn extract_url(href: &str) -> Option<String> {
    let full_href = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };

    let parsed = Url::parse(&full_href).ok()?;

    if parsed.host_str() == Some("duckduckgo.com") && parsed.path().starts_with("/l/") {
        parsed
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, value)| value.into_owned())
    } else {
        Some(full_href)
    }
}
