//! Auth-plane client: password sessions against the hosted auth service.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use gadget_grove_core::{Email, EmailError, UserId};

/// Errors that can occur during remote authentication.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// HTTP request failed before a response was produced.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Email or password was rejected.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An account with this email already exists.
    #[error("account already registered")]
    AlreadyRegistered,

    /// The held access token is no longer valid.
    #[error("session expired or invalid")]
    SessionExpired,

    /// The auth plane returned an email the core types reject.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Any other non-success answer from the auth plane.
    #[error("auth error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        message: String,
    },

    /// Response body could not be decoded.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The authenticated identity a session resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// Identity in the remote store; keys row-level security.
    pub id: UserId,
    /// Address the account was registered with.
    pub email: Email,
}

/// An established session: the identity plus the bearer token that proves it.
#[derive(Clone)]
pub struct Session {
    /// Bearer token for data-plane calls under this identity.
    pub access_token: SecretString,
    /// The identity the token resolves to.
    pub user: AuthUser,
}

/// Profile attributes sent with registration.
///
/// These travel as signup metadata; the remote side materializes them into
/// the `profiles` row it creates for the new account.
#[derive(Debug, Clone, Serialize)]
pub struct SignUpProfile {
    /// Display name.
    pub name: String,
}

/// Outcome of a registration attempt.
pub enum SignUp {
    /// The account is active and a session was issued.
    Session(Session),
    /// The account needs email confirmation before it can sign in.
    ConfirmationRequired,
}

#[derive(Deserialize)]
struct SessionPayload {
    access_token: Option<String>,
    user: Option<UserPayload>,
}

#[derive(Deserialize)]
struct UserPayload {
    id: String,
    email: String,
}

impl UserPayload {
    fn into_user(self) -> Result<AuthUser, AuthError> {
        Ok(AuthUser {
            id: UserId::new(self.id),
            email: Email::parse(&self.email)?,
        })
    }
}

/// Client for the remote store's auth plane.
///
/// Stateless: session state lives with the caller (see the storefront's
/// `AuthSession`). Cheap to clone.
#[derive(Clone)]
pub struct AuthClient {
    inner: Arc<AuthClientInner>,
}

struct AuthClientInner {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl AuthClient {
    /// Create a new auth-plane client.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            inner: Arc::new(AuthClientInner {
                http: reqwest::Client::new(),
                base_url: base_url.into().trim_end_matches('/').to_string(),
                api_key,
            }),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.inner.base_url)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.inner
            .http
            .request(method, self.endpoint(path))
            .header("apikey", self.inner.api_key.expose_secret())
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] when the auth plane rejects
    /// the pair, or a transport/decoding error.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_in(&self, email: &Email, password: &str) -> Result<Session, AuthError> {
        let response = self
            .request(reqwest::Method::POST, "token")
            .query(&[("grant_type", "password")])
            .json(&serde_json::json!({
                "email": email.as_str(),
                "password": password,
            }))
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::BAD_REQUEST || status == reqwest::StatusCode::UNAUTHORIZED
        {
            return Err(AuthError::InvalidCredentials);
        }
        let body = check_status(status, response).await?;

        session_from_body(&body)
    }

    /// Register a new account.
    ///
    /// Depending on the project's confirmation policy the auth plane either
    /// issues a session immediately or withholds one until the address is
    /// confirmed; both are successful outcomes.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AlreadyRegistered`] for duplicate accounts, or a
    /// transport/decoding error.
    #[instrument(skip(self, password, profile), fields(email = %email))]
    pub async fn sign_up(
        &self,
        email: &Email,
        password: &str,
        profile: &SignUpProfile,
    ) -> Result<SignUp, AuthError> {
        let response = self
            .request(reqwest::Method::POST, "signup")
            .json(&serde_json::json!({
                "email": email.as_str(),
                "password": password,
                "data": profile,
            }))
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
            || status == reqwest::StatusCode::CONFLICT
        {
            return Err(AuthError::AlreadyRegistered);
        }
        let body = check_status(status, response).await?;

        match session_from_body(&body) {
            Ok(session) => Ok(SignUp::Session(session)),
            // No token in the payload: account created, confirmation pending
            Err(AuthError::SessionExpired) => Ok(SignUp::ConfirmationRequired),
            Err(other) => Err(other),
        }
    }

    /// Revoke a session.
    ///
    /// # Errors
    ///
    /// Returns a transport error or a non-success answer from the auth plane.
    #[instrument(skip_all)]
    pub async fn sign_out(&self, access_token: &SecretString) -> Result<(), AuthError> {
        let response = self
            .request(reqwest::Method::POST, "logout")
            .bearer_auth(access_token.expose_secret())
            .send()
            .await?;

        check_status(response.status(), response).await.map(drop)
    }

    /// Resolve a held access token to its identity.
    ///
    /// Used once when re-establishing state from a stored token; a failure
    /// here means the token is stale, which callers treat as
    /// "unauthenticated" rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::SessionExpired`] if the token no longer
    /// resolves, or a transport/decoding error.
    #[instrument(skip_all)]
    pub async fn get_user(&self, access_token: &SecretString) -> Result<AuthUser, AuthError> {
        let response = self
            .request(reqwest::Method::GET, "user")
            .bearer_auth(access_token.expose_secret())
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(AuthError::SessionExpired);
        }
        let body = check_status(status, response).await?;

        let payload: UserPayload = serde_json::from_str(&body)?;
        payload.into_user()
    }
}

fn session_from_body(body: &str) -> Result<Session, AuthError> {
    let payload: SessionPayload = serde_json::from_str(body)?;
    match (payload.access_token, payload.user) {
        (Some(token), Some(user)) => Ok(Session {
            access_token: SecretString::from(token),
            user: user.into_user()?,
        }),
        _ => Err(AuthError::SessionExpired),
    }
}

async fn check_status(
    status: reqwest::StatusCode,
    response: reqwest::Response,
) -> Result<String, AuthError> {
    let body = response.text().await?;
    if !status.is_success() {
        tracing::error!(
            status = %status,
            body = %body.chars().take(500).collect::<String>(),
            "Auth plane returned non-success status"
        );
        return Err(AuthError::Api {
            status: status.as_u16(),
            message: body.chars().take(500).collect(),
        });
    }
    Ok(body)
}
