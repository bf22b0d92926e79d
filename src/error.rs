//! Error types for Chargify API operations.

use thiserror::Error;

/// Errors that can occur during Chargify API operations.
#[derive(Debug, Error)]
pub enum ChargifyError {
    /// Configuration is missing or incomplete.
    #[error("Chargify configuration required: {0}")]
    ConfigMissing(String),

    /// Entity not found, either reported by the API or rejected locally
    /// because it belongs to a different owner.
    #[error("{entity_type} '{id}' not found")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// A member operation was attempted on a record the API has not assigned an id to.
    #[error("{entity_type} has no id; save it before calling member operations")]
    MissingId { entity_type: &'static str },

    /// API request failed.
    #[error("Chargify API error: {message}")]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },
}

impl ChargifyError {
    /// Returns true if the API answered 404 or the entity was rejected as not found.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ChargifyError::NotFound { .. }
                | ChargifyError::ApiError {
                    status_code: Some(404),
                    ..
                }
        )
    }

    /// Attach entity context to a bare 404 coming from the transport layer.
    pub(crate) fn or_not_found(self, entity_type: &'static str, id: impl ToString) -> Self {
        match self {
            ChargifyError::ApiError {
                status_code: Some(404),
                ..
            } => ChargifyError::NotFound {
                entity_type,
                id: id.to_string(),
            },
            other => other,
        }
    }
}

/// Result type alias for Chargify operations.
pub type Result<T> = core::result::Result<T, ChargifyError>;
