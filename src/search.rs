//! Web search: backend boundary, result normalization and the provider that
//! ties them together.

mod backend;
mod duckduckgo;
mod error;
mod normalize;
mod provider;

pub use backend::{RawResult, RawResults, SafeSearch, SearchBackend, TimeLimit};
pub use duckduckgo::{DEFAULT_ENDPOINT, DuckDuckGoBackend, DuckDuckGoBackendBuilder};
pub use error::SearchError;
pub use normalize::normalize;
pub use provider::{DEFAULT_MAX_RESULTS, SearchOptions, SearchProvider, SearchProviderBuilder};
