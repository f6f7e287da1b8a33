//! Unified error handling with Sentry integration.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use gadget_grove_remote_store::{AuthError, StoreError};

use crate::models::Notice;
use crate::services::auth::AdminAuthError;
use crate::services::catalog::EditorError;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Login/gate failure.
    #[error("Admin auth error: {0}")]
    Auth(#[from] AdminAuthError),

    /// Editor failure (validation, confirmation, or store).
    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    /// Remote store failure outside the editor.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// User is not signed in as an admin.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AdminError {
    const fn is_server_fault(&self) -> bool {
        matches!(
            self,
            Self::Store(_)
                | Self::Internal(_)
                | Self::Editor(EditorError::Store(_))
                | Self::Auth(AdminAuthError::RoleCheck(_))
        )
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Auth(err) => match err {
                AdminAuthError::Auth(AuthError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
                AdminAuthError::NotAdmin => StatusCode::FORBIDDEN,
                AdminAuthError::Auth(_) | AdminAuthError::RoleCheck(_) => StatusCode::BAD_GATEWAY,
            },
            Self::Editor(err) => match err {
                EditorError::Validation(_) | EditorError::ConfirmationRequired => {
                    StatusCode::BAD_REQUEST
                }
                EditorError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
                EditorError::Store(_) => StatusCode::BAD_GATEWAY,
            },
            Self::Store(StoreError::NotFound(_)) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(_) => StatusCode::BAD_GATEWAY,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-safe notice text; internals are never exposed.
    fn notice_message(&self) -> String {
        match self {
            Self::Auth(err) => match err {
                AdminAuthError::Auth(AuthError::InvalidCredentials) => {
                    "Invalid credentials".to_string()
                }
                AdminAuthError::NotAdmin => "Unauthorized: Admin access required".to_string(),
                AdminAuthError::Auth(_) | AdminAuthError::RoleCheck(_) => {
                    "Authentication service error".to_string()
                }
            },
            // Validation messages are written for the form and safe to show
            Self::Editor(EditorError::Validation(err)) => err.to_string(),
            Self::Editor(EditorError::ConfirmationRequired) => {
                "Confirm deletion to remove this product".to_string()
            }
            Self::Editor(EditorError::Store(StoreError::NotFound(_))) => {
                "Product not found".to_string()
            }
            Self::Editor(EditorError::Store(_)) | Self::Store(_) => {
                "Something went wrong talking to the store. Please try again.".to_string()
            }
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Unauthorized(_) | Self::BadRequest(_) | Self::NotFound(_) => self.to_string(),
        }
    }
}

impl IntoResponse for AdminError {
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

/// Result type alias for `AdminError`.
pub type Result<T> = std::result::Result<T, AdminError>;
