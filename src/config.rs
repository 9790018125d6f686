//! Runtime configuration.
//!
//! The environment is read in exactly one place, [`ApiConfig::from_env`]. The
//! resulting value is passed by construction into the stages that need it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::llm::{ChatClientBuilder, ChatClientTrait, DEFAULT_BASE_URL, LlmError};

/// Environment variable holding the completion API credential.
pub const API_KEY_ENV: &str = "DEEPSEEK_API_KEY";
/// Environment variable overriding the completion API base URL.
pub const BASE_URL_ENV: &str = "DEEPSEEK_BASE_URL";
/// Default chat model for answering and evaluation.
pub const DEFAULT_MODEL: &str = "deepseek-chat";

const APP_DIR: &str = "webrag";
const SETTINGS_FILE: &str = ".env";

/// Credential and endpoint for the completion API.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    api_key: Option<String>,
    base_url: String,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ApiConfig {
    /// Creates a configuration; a blank key counts as no key.
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: base_url.into(),
        }
    }

    /// Reads `DEEPSEEK_API_KEY` and `DEEPSEEK_BASE_URL` from the environment.
    pub fn from_env() -> Self {
        let api_key = std::env::var(API_KEY_ENV).ok();
        let base_url = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(api_key, base_url)
    }

    /// Replaces the key for this run when `api_key` is present and non-blank.
    pub fn with_api_key_override(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|key| !key.trim().is_empty()) {
            self.api_key = Some(key);
        }
        self
    }

    /// Replaces the base URL when `base_url` is present.
    pub fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|url| !url.trim().is_empty()) {
            self.base_url = url;
        }
        self
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Builds a chat client when a credential is configured.
    ///
    /// Returns `Ok(None)` without a credential; the stages then take their
    /// no-credential paths.
    pub fn chat_client(&self) -> Result<Option<Arc<dyn ChatClientTrait>>, LlmError> {
        let Some(api_key) = &self.api_key else {
            return Ok(None);
        };

        let client = ChatClientBuilder::new()
            .api_key(api_key.clone())
            .base_url(self.base_url.clone())
            .build()?;
        Ok(Some(Arc::new(client)))
    }
}

/// Candidate settings files, in load order.
///
/// `./.env` comes first, then `{config_dir}/webrag/.env`.
pub fn settings_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SETTINGS_FILE)];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(APP_DIR).join(SETTINGS_FILE));
    }
    paths
}

/// Loads each existing settings file into the process environment.
///
/// Variables that are already set are never overridden. Returns the files
/// that were loaded.
pub fn load_settings_files<P: AsRef<Path>>(paths: &[P]) -> Vec<PathBuf> {
    let mut loaded = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if !path.is_file() {
            continue;
        }
        match dotenvy::from_path(path) {
            Ok(()) => {
                debug!(path = %path.display(), "loaded settings file");
                loaded.push(path.to_path_buf());
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings file");
            }
        }
    }
    loaded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_key_counts_as_missing() {
        let config = ApiConfig::new(Some("  ".to_string()), DEFAULT_BASE_URL);
        assert!(!config.has_credential());
        assert!(config.chat_client().unwrap().is_none());
    }

    #[test]
    fn override_replaces_key() {
        let config = ApiConfig::new(Some("from-env".to_string()), DEFAULT_BASE_URL)
            .with_api_key_override(Some("from-flag".to_string()));
        assert_eq!(config.api_key(), Some("from-flag"));
    }

    #[test]
    fn absent_override_keeps_key() {
        let config = ApiConfig::new(Some("from-env".to_string()), DEFAULT_BASE_URL)
            .with_api_key_override(None);
        assert_eq!(config.api_key(), Some("from-env"));
    }

    #[test]
    fn base_url_override() {
        let config = ApiConfig::default().with_base_url_override(Some("http://localhost:1".into()));
        assert_eq!(config.base_url(), "http://localhost:1");

        let config = ApiConfig::default().with_base_url_override(None);
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn chat_client_built_with_credential() {
        let config = ApiConfig::new(Some("sk-test".to_string()), DEFAULT_BASE_URL);
        assert!(config.chat_client().unwrap().is_some());
    }

    #[test]
    fn chat_client_rejects_invalid_base_url() {
        let config = ApiConfig::new(Some("sk-test".to_string()), "not a url");
        assert!(matches!(config.chat_client(), Err(LlmError::InvalidUrl(_))));
    }

    #[test]
    fn debug_redacts_key() {
        let config = ApiConfig::new(Some("sk-secret".to_string()), DEFAULT_BASE_URL);
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn settings_paths_start_with_local_file() {
        let paths = settings_paths();
        assert_eq!(paths[0], PathBuf::from(".env"));
    }

    #[test]
    fn missing_settings_files_are_skipped() {
        let loaded = load_settings_files(&["/nonexistent/webrag/.env"]);
        assert!(loaded.is_empty());
    }
}
