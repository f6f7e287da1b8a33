//! Admin auth route handlers.

use axum::{Json, extract::State};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use gadget_grove_core::{Email, UserId};
use gadget_grove_remote_store::AuthError;

use crate::error::{AdminError, Result};
use crate::middleware::auth::RequireAdmin;
use crate::models::{CurrentAdmin, Notice, session_keys};
use crate::services::auth::AdminAuthError;
use crate::state::AppState;

/// Minimum password length, matching the remote auth plane's default.
const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub notice: Notice,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<AdminView>,
}

#[derive(Serialize)]
pub struct AdminView {
    pub id: UserId,
    pub email: Email,
}

/// `POST /auth/login` - sign in and pass the role gate.
///
/// A sign-in whose profile role is not `admin` is revoked before the error
/// is reported; no session state is written in that case.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let email = Email::parse(&request.email)
        .map_err(|e| AdminError::Auth(AdminAuthError::Auth(AuthError::from(e))))?;
    if request.password.len() < MIN_PASSWORD_LENGTH {
        return Err(AdminError::BadRequest(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    let remote_session = state.gate().login(&email, &request.password).await?;

    let admin = CurrentAdmin {
        id: remote_session.user.id.clone(),
        email: remote_session.user.email.clone(),
        access_token: remote_session.access_token.expose_secret().to_string(),
    };
    session
        .insert(session_keys::CURRENT_ADMIN, &admin)
        .await
        .map_err(|e| AdminError::Internal(e.to_string()))?;

    Ok(Json(AuthResponse {
        notice: Notice::success("Admin login successful!"),
        user: Some(AdminView {
            id: remote_session.user.id.clone(),
            email: remote_session.user.email.clone(),
        }),
    }))
}

/// `POST /auth/logout` - revoke the admin session.
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<AuthResponse>> {
    let token = SecretString::from(admin.access_token);
    state.gate().logout(&token).await?;

    session
        .flush()
        .await
        .map_err(|e| AdminError::Internal(e.to_string()))?;

    Ok(Json(AuthResponse {
        notice: Notice::success("Logged out successfully"),
        user: None,
    }))
}
