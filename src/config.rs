//! Client configuration.
//!
//! Chargify accounts are addressed by subdomain. The API key authenticates
//! requests and the shared key signs hosted page URLs.

use std::env;

use url::Url;

use crate::error::{ChargifyError, Result};

/// Immutable configuration handed to [`ChargifyClient`](crate::ChargifyClient).
///
/// # Example
///
/// ```
/// use chargify::ChargifyConfig;
///
/// let config = ChargifyConfig::new("acme", "api-key", "shared-key");
/// assert_eq!(config.site_url(), "https://acme.chargify.com/");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ChargifyConfig {
    subdomain: String,
    api_key: String,
    shared_key: String,
    api_url: Option<String>,
}

impl std::fmt::Debug for ChargifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChargifyConfig")
            .field("subdomain", &self.subdomain)
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl ChargifyConfig {
    /// Create a configuration for the given site.
    pub fn new(subdomain: &str, api_key: &str, shared_key: &str) -> Self {
        Self {
            subdomain: subdomain.to_string(),
            api_key: api_key.to_string(),
            shared_key: shared_key.to_string(),
            api_url: None,
        }
    }

    /// Read configuration from environment variables.
    ///
    /// - `CHARGIFY_SUBDOMAIN` (required)
    /// - `CHARGIFY_API_KEY` (required)
    /// - `CHARGIFY_SHARED_KEY` (optional, only needed for hosted page URLs)
    /// - `CHARGIFY_API_URL` (optional, overrides the API base URL)
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is not set.
    pub fn from_env() -> Result<Self> {
        let subdomain = env::var("CHARGIFY_SUBDOMAIN").map_err(|_| {
            ChargifyError::ConfigMissing(
                "CHARGIFY_SUBDOMAIN environment variable not set".to_string(),
            )
        })?;
        let api_key = env::var("CHARGIFY_API_KEY").map_err(|_| {
            ChargifyError::ConfigMissing("CHARGIFY_API_KEY environment variable not set".to_string())
        })?;
        let shared_key = env::var("CHARGIFY_SHARED_KEY").unwrap_or_default();

        let mut config = Self::new(&subdomain, &api_key, &shared_key);
        if let Ok(api_url) = env::var("CHARGIFY_API_URL") {
            config = config.with_api_url(&api_url);
        }
        Ok(config)
    }

    /// Send API requests to `api_url` instead of the site URL.
    ///
    /// Hosted page URLs always point at the real site.
    #[must_use]
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = Some(api_url.to_string());
        self
    }

    /// The site subdomain.
    pub fn subdomain(&self) -> &str {
        &self.subdomain
    }

    /// The API key used as the basic auth username.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The shared key used to sign hosted page URLs.
    pub fn shared_key(&self) -> &str {
        &self.shared_key
    }

    /// `https://<subdomain>.chargify.com/`
    pub fn site_url(&self) -> String {
        format!("https://{}.chargify.com/", self.subdomain)
    }

    /// Base URL for API requests, always ending in `/`.
    pub(crate) fn api_base_url(&self) -> Result<Url> {
        let base = self.api_url.clone().unwrap_or_else(|| self.site_url());
        let base = if base.ends_with('/') {
            base
        } else {
            format!("{base}/")
        };
        Ok(Url::parse(&base)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_secrets() {
        let config = ChargifyConfig::new("acme", "api-secret", "shared-secret");
        let debug = format!("{:?}", config);
        assert!(debug.contains("acme"));
        assert!(!debug.contains("api-secret"));
        assert!(!debug.contains("shared-secret"));
    }

    #[test]
    fn test_api_base_url_defaults_to_site() {
        let config = ChargifyConfig::new("acme", "key", "shared");
        assert_eq!(
            config.api_base_url().unwrap().as_str(),
            "https://acme.chargify.com/"
        );
    }

    #[test]
    fn test_api_url_override_gets_trailing_slash() {
        let config = ChargifyConfig::new("acme", "key", "shared").with_api_url("http://127.0.0.1:9000");
        assert_eq!(
            config.api_base_url().unwrap().as_str(),
            "http://127.0.0.1:9000/"
        );
        assert_eq!(config.site_url(), "https://acme.chargify.com/");
    }
}
