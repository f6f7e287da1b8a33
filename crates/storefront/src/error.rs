//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side faults to
//! Sentry before responding. All route handlers return `Result<T, AppError>`;
//! every failure path renders as exactly one transient notice.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use gadget_grove_remote_store::{AuthError, StoreError};

use crate::cart::CartError;
use crate::models::Notice;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Remote auth plane failure.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Remote store failure.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Cart operation failure.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn is_server_fault(&self) -> bool {
        matches!(
            self,
            Self::Store(_) | Self::Internal(_) | Self::Cart(CartError::Store(_))
        )
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Store(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::SessionExpired => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::AlreadyRegistered => StatusCode::CONFLICT,
                AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::Http(_) | AuthError::Api { .. } | AuthError::Parse(_) => {
                    StatusCode::BAD_GATEWAY
                }
            },
            Self::Cart(err) => match err {
                CartError::NotAuthenticated => StatusCode::UNAUTHORIZED,
                CartError::ItemNotFound(_) => StatusCode::NOT_FOUND,
                CartError::InvalidQuantity
                | CartError::UnknownVariantGroup(_)
                | CartError::UnknownVariantOption { .. } => StatusCode::BAD_REQUEST,
                CartError::Store(_) => StatusCode::BAD_GATEWAY,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Client-safe notice text; internals are never exposed.
    fn notice_message(&self) -> String {
        match self {
            Self::Store(_) | Self::Cart(CartError::Store(_)) => {
                "Something went wrong talking to the store. Please try again.".to_string()
            }
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid credentials".to_string(),
                AuthError::AlreadyRegistered => {
                    "An account with this email already exists".to_string()
                }
                AuthError::SessionExpired => "Session expired, please sign in again".to_string(),
                AuthError::InvalidEmail(_) => "Invalid email address".to_string(),
                AuthError::Http(_) | AuthError::Api { .. } | AuthError::Parse(_) => {
                    "Authentication service error".to_string()
                }
            },
            Self::Cart(err) => match err {
                CartError::NotAuthenticated => "Sign in to use your cart".to_string(),
                CartError::ItemNotFound(_) => "That item is no longer in your cart".to_string(),
                CartError::InvalidQuantity => "Quantity must be at least 1".to_string(),
                CartError::UnknownVariantGroup(_) | CartError::UnknownVariantOption { .. } => {
                    "Selected options do not match this product".to_string()
                }
                CartError::Store(_) => {
                    "Something went wrong talking to the store. Please try again.".to_string()
                }
            },
            Self::NotFound(_) | Self::Unauthorized(_) | Self::BadRequest(_) => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server-side faults to Sentry
        if self.is_server_fault() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();
        let notice = Notice::error(self.notice_message());
        (status, Json(serde_json::json!({ "notice": notice }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    use gadget_grove_core::CartItemId;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product p-123".to_string());
        assert_eq!(err.to_string(), "Not found: product p-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn cart_errors_map_to_client_statuses() {
        assert_eq!(
            get_status(AppError::Cart(CartError::NotAuthenticated)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Cart(CartError::ItemNotFound(CartItemId::new(
                "ci-1"
            )))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Cart(CartError::InvalidQuantity)),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn store_failures_do_not_leak_internals() {
        let err = AppError::Store(StoreError::Api {
            status: 500,
            message: "permission denied for table cart_items".to_string(),
        });
        assert!(!err.notice_message().contains("cart_items"));
    }

    #[test]
    fn auth_statuses_distinguish_credentials_from_transport() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::AlreadyRegistered)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::Api {
                status: 500,
                message: "boom".to_string()
            })),
            StatusCode::BAD_GATEWAY
        );
    }
}
