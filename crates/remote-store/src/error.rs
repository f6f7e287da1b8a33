//! Store error type.

use thiserror::Error;

/// Errors that can occur when talking to the remote store's data plane.
///
/// Remote CRUD failures are deliberately uniform: network faults, permission
/// denials, and constraint violations all surface as a `StoreError` and are
/// handled identically by callers (retained local state, one user-visible
/// notice).
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed before a response was produced.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("store error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated for logging.
        message: String,
    },

    /// Response body could not be decoded.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A single-row lookup matched no rows.
    #[error("not found: {0}")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_includes_status() {
        let err = StoreError::Api {
            status: 403,
            message: "permission denied for table cart_items".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "store error (HTTP 403): permission denied for table cart_items"
        );
    }

    #[test]
    fn not_found_display() {
        let err = StoreError::NotFound("products id=missing".to_string());
        assert_eq!(err.to_string(), "not found: products id=missing");
    }
}
