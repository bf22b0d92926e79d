//! Chargify API client.
//!
//! Low-level HTTP client that handles authentication and raw requests.
//! Resource operations are implemented via traits on entity types.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::config::ChargifyConfig;
use crate::error::{ChargifyError, Result};

const USER_AGENT: &str = concat!("chargify/", env!("CARGO_PKG_VERSION"));

/// Chargify ignores the basic auth password; the API key alone authenticates.
const BASIC_AUTH_PASSWORD: &str = "X";

/// Empty query string for sub-actions that take no parameters.
pub(crate) const NO_QUERY: &[(&str, &str)] = &[];

/// Low-level Chargify API client.
///
/// Handles authentication and HTTP requests. Entity-specific operations
/// are implemented via the [`Find`](crate::Find) and
/// [`Persist`](crate::Persist) traits on model types.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use chargify::{ChargifyClient, ChargifyConfig};
///
/// # fn example() -> chargify::Result<()> {
/// // Create from environment variables
/// let client = ChargifyClient::from_env()?;
///
/// // Or configure manually
/// let client = ChargifyClient::new(ChargifyConfig::new("acme", "api-key", "shared-key"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ChargifyClient {
    http: Client,
    base_url: Arc<Url>,
    config: Arc<ChargifyConfig>,
}

impl std::fmt::Debug for ChargifyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChargifyClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ChargifyClient {
    /// Create a client from environment variables.
    ///
    /// See [`ChargifyConfig::from_env`] for the variables read.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is not set.
    pub fn from_env() -> Result<Self> {
        Self::new(ChargifyConfig::from_env()?)
    }

    /// Create a new client from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(config: ChargifyConfig) -> Result<Self> {
        let base_url = config.api_base_url()?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(ChargifyError::HttpError)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            config: Arc::new(config),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get the configuration this client was built from.
    pub fn config(&self) -> &ChargifyConfig {
        &self.config
    }

    /// Make a GET request.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, path: &str) -> Result<Response> {
        let request = self.request(Method::GET, path)?;
        self.send(request).await
    }

    /// Make a GET request with query parameters.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Response> {
        let request = self.request(Method::GET, path)?.query(query);
        self.send(request).await
    }

    /// Make a POST request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        let request = self.request(Method::POST, path)?.json(body);
        self.send(request).await
    }

    /// Make a POST request with a pre-encoded JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn post_raw(&self, path: &str, body: String) -> Result<Response> {
        let request = self
            .request(Method::POST, path)?
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);
        self.send(request).await
    }

    /// Make a PUT request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        let request = self.request(Method::PUT, path)?.json(body);
        self.send(request).await
    }

    /// Make a DELETE request.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, path: &str) -> Result<Response> {
        let request = self.request(Method::DELETE, path)?;
        self.send(request).await
    }

    /// Issue a named sub-action against a member URL.
    ///
    /// Sends `method` to `<member_path>/<name>.json` with the given query
    /// parameters and optional JSON body. Returns the decoded body,
    /// [`Value::Null`] for an empty body, or [`Value::String`] for a body
    /// that is not JSON.
    #[tracing::instrument(skip(self, query, body))]
    pub async fn action<Q, B>(
        &self,
        method: Method,
        member_path: &str,
        name: &str,
        query: &Q,
        body: Option<&B>,
    ) -> Result<Value>
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let path = format!("{member_path}/{name}.json");
        let mut request = self.request(method, &path)?.query(query);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = self.send(request).await?;
        Self::read_value(response).await
    }

    /// Read a response body as JSON, tolerating empty and plain-text bodies.
    pub(crate) async fn read_value(response: Response) -> Result<Value> {
        let text = response.text().await.map_err(ChargifyError::HttpError)?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Value::Null);
        }
        match serde_json::from_str(trimmed) {
            Ok(value) => Ok(value),
            Err(_) => {
                tracing::debug!("Non-JSON response body, returning as text");
                Ok(Value::String(trimmed.to_string()))
            }
        }
    }

    /// Build an authenticated request for a path relative to the base URL.
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.base_url.join(path)?;

        Ok(self
            .http
            .request(method, url)
            .basic_auth(self.config.api_key(), Some(BASIC_AUTH_PASSWORD))
            .header(reqwest::header::ACCEPT, "application/json"))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(ChargifyError::HttpError)?;
        Self::check_response(response).await
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        // Handle rate limiting
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(ChargifyError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let message = Self::extract_error_message(response, status).await;
        tracing::debug!(status = status.as_u16(), %message, "Chargify request failed");
        Err(ChargifyError::ApiError {
            message,
            status_code: Some(status.as_u16()),
        })
    }

    /// Extract error message from a failed response.
    async fn extract_error_message(response: Response, status: reqwest::StatusCode) -> String {
        let body = match response.text().await {
            Ok(b) => b,
            Err(_) => return format!("HTTP {status}"),
        };

        if body.trim().is_empty() {
            return format!("HTTP {status}");
        }

        // Chargify reports validation failures as {"errors": ["..", ".."]}
        if let Ok(json) = serde_json::from_str::<Value>(&body) {
            if let Some(errors) = json.get("errors").and_then(|e| e.as_array()) {
                let messages: Vec<&str> = errors.iter().filter_map(|e| e.as_str()).collect();
                if !messages.is_empty() {
                    return messages.join("; ");
                }
            }
            if let Some(err) = json.get("error").and_then(|m| m.as_str()) {
                return err.to_string();
            }
            if let Some(msg) = json.get("message").and_then(|m| m.as_str()) {
                return msg.to_string();
            }
        }

        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_debug() {
        let client = ChargifyClient::new(ChargifyConfig::new("acme", "test-key", "test-shared")).unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("ChargifyClient"));
        assert!(debug.contains("base_url"));
        // Secrets should not be in debug output
        assert!(!debug.contains("test-key"));
        assert!(!debug.contains("test-shared"));
    }

    #[test]
    fn test_base_url_from_subdomain() {
        let client = ChargifyClient::new(ChargifyConfig::new("acme", "key", "shared")).unwrap();
        assert_eq!(client.base_url().as_str(), "https://acme.chargify.com/");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client1 = ChargifyClient::new(
            ChargifyConfig::new("acme", "key", "shared").with_api_url("http://localhost:8080/api"),
        )
        .unwrap();
        let client2 = ChargifyClient::new(
            ChargifyConfig::new("acme", "key", "shared").with_api_url("http://localhost:8080/api/"),
        )
        .unwrap();
        assert_eq!(client1.base_url().as_str(), client2.base_url().as_str());
    }
}
