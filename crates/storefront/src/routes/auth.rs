//! Auth route handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use gadget_grove_core::{Email, UserId};
use gadget_grove_remote_store::{AuthError, SignUp, SignUpProfile};
use secrecy::ExposeSecret;

use crate::error::{AppError, Result};
use crate::middleware::auth::RequireAuth;
use crate::models::{CurrentUser, Notice, session_keys};
use crate::state::AppState;

/// Minimum password length, matching the remote auth plane's default.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Minimum display-name length for registration.
const MIN_NAME_LENGTH: usize = 2;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Identity payload echoed to the client after auth operations.
#[derive(Serialize)]
pub struct UserView {
    pub id: UserId,
    pub email: Email,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub notice: Notice,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserView>,
}

/// `POST /auth/register` - create an account and, when the auth plane
/// issues a session immediately, sign straight in.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>> {
    if request.name.trim().len() < MIN_NAME_LENGTH {
        return Err(AppError::BadRequest(
            "Name must be at least 2 characters".to_string(),
        ));
    }
    let email = Email::parse(&request.email).map_err(AuthError::from)?;
    validate_password(&request.password)?;

    let profile = SignUpProfile {
        name: request.name.trim().to_string(),
    };
    let outcome = state
        .auth()
        .sign_up(&email, &request.password, &profile)
        .await?;

    match outcome {
        SignUp::Session(remote_session) => {
            let user = persist_session(&state, &session, &remote_session).await?;
            Ok(Json(AuthResponse {
                notice: Notice::success("Account created successfully!"),
                user: Some(user),
            }))
        }
        SignUp::ConfirmationRequired => Ok(Json(AuthResponse {
            notice: Notice::success(
                "Account created successfully! Please check your email for verification.",
            ),
            user: None,
        })),
    }
}

/// `POST /auth/login` - sign in with email and password.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let email = Email::parse(&request.email).map_err(AuthError::from)?;

    let remote_session = state.auth().sign_in(&email, &request.password).await?;
    let user = persist_session(&state, &session, &remote_session).await?;

    Ok(Json(AuthResponse {
        notice: Notice::success("Signed in successfully!"),
        user: Some(user),
    }))
}

/// `POST /auth/logout` - revoke the remote session and tear down the
/// identity's context (destroying its cart mirror).
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Result<Json<AuthResponse>> {
    let context = state.context_for(&user).await;
    context.auth.sign_out().await?;

    state.remove_context(&user.id).await;
    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(AuthResponse {
        notice: Notice::success("Logged out successfully"),
        user: None,
    }))
}

async fn persist_session(
    state: &AppState,
    session: &Session,
    remote_session: &gadget_grove_remote_store::Session,
) -> Result<UserView> {
    state.install_context(remote_session).await;

    let current = CurrentUser {
        id: remote_session.user.id.clone(),
        email: remote_session.user.email.clone(),
        access_token: remote_session.access_token.expose_secret().to_string(),
    };
    session
        .insert(session_keys::CURRENT_USER, &current)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(UserView {
        id: remote_session.user.id.clone(),
        email: remote_session.user.email.clone(),
    })
}

fn validate_password(password: &str) -> Result<()> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::BadRequest(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}
