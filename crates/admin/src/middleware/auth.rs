//! Admin gate extractor.
//!
//! `RequireAdmin` resolves the session identity and re-runs the role
//! authorization query against the remote store for every privileged
//! request. The verdict is not cached anywhere beyond the request.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use secrecy::SecretString;
use tower_sessions::Session;

use crate::models::{CurrentAdmin, Notice, session_keys};
use crate::state::AppState;

/// Extractor that requires a signed-in user whose profile role is `admin`.
pub struct RequireAdmin(pub CurrentAdmin);

/// Rejection for requests that fail the gate.
pub enum AdminRejection {
    /// No signed-in identity at all.
    Unauthenticated,
    /// Signed in, but the role check did not pass.
    NotAdmin,
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthenticated => (StatusCode::UNAUTHORIZED, "Sign in to continue"),
            Self::NotAdmin => (StatusCode::FORBIDDEN, "Unauthorized: Admin access required"),
        };
        (
            status,
            Json(serde_json::json!({ "notice": Notice::error(message) })),
        )
            .into_response()
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AdminRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Session is placed in extensions by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminRejection::Unauthenticated)?;

        let admin: CurrentAdmin = session
            .get(session_keys::CURRENT_ADMIN)
            .await
            .ok()
            .flatten()
            .ok_or(AdminRejection::Unauthenticated)?;

        let token = SecretString::from(admin.access_token.clone());
        state
            .gate()
            .verify(&token, &admin.id)
            .await
            .map_err(|_| AdminRejection::NotAdmin)?;

        Ok(Self(admin))
    }
}
