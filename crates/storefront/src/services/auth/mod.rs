//! Auth session state and change observation.
//!
//! There is no ambient "current session": every component that issues remote
//! calls is handed an [`AuthSession`] (or an observer derived from one)
//! explicitly. Change notification rides a `tokio::sync::watch` channel, so
//! updates reach observers synchronously and an observer that has been
//! dropped can never be called back.

use secrecy::SecretString;
use tokio::sync::watch;

use gadget_grove_core::UserId;
use gadget_grove_remote_store::{AuthClient, AuthError, AuthUser, Session};

/// Read-only projection of the authentication state.
#[derive(Clone, Default)]
pub struct AuthState {
    user: Option<AuthUser>,
    access_token: Option<SecretString>,
}

impl AuthState {
    fn from_session(session: &Session) -> Self {
        Self {
            user: Some(session.user.clone()),
            access_token: Some(session.access_token.clone()),
        }
    }

    /// The authenticated identity, if any.
    #[must_use]
    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    /// The id of the authenticated identity, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<&UserId> {
        self.user.as_ref().map(|u| &u.id)
    }

    /// Whether an identity is established.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Bearer token for remote calls under this identity.
    #[must_use]
    pub fn access_token(&self) -> Option<&SecretString> {
        self.access_token.as_ref()
    }
}

/// Per-identity session state.
///
/// Owns the watch channel that observers subscribe to. Dropped together with
/// the identity's context on sign-out, which is what destroys the cart
/// mirror keyed to it.
pub struct AuthSession {
    client: AuthClient,
    state: watch::Sender<AuthState>,
}

impl AuthSession {
    /// Wrap a session just issued by sign-in or sign-up.
    #[must_use]
    pub fn establish(client: AuthClient, session: &Session) -> Self {
        let (state, _) = watch::channel(AuthState::from_session(session));
        Self { client, state }
    }

    /// Re-establish state from a stored access token.
    ///
    /// Queries the identity behind the token exactly once; any failure is
    /// treated as "unauthenticated", never surfaced as an error.
    pub async fn resume(client: AuthClient, access_token: SecretString) -> Self {
        let state = match client.get_user(&access_token).await {
            Ok(user) => AuthState {
                user: Some(user),
                access_token: Some(access_token),
            },
            Err(err) => {
                tracing::debug!(error = %err, "Stored token did not resume; treating as unauthenticated");
                AuthState::default()
            }
        };
        let (state, _) = watch::channel(state);
        Self { client, state }
    }

    /// Subscribe to state changes.
    #[must_use]
    pub fn observe(&self) -> AuthStateObserver {
        AuthStateObserver {
            rx: self.state.subscribe(),
        }
    }

    /// The current state.
    #[must_use]
    pub fn current(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Revoke the remote session and broadcast the unauthenticated state.
    ///
    /// # Errors
    ///
    /// Returns the auth-plane error if revocation fails; observers are not
    /// notified in that case and the local state is unchanged.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let token = self.current().access_token().cloned();
        if let Some(token) = token {
            self.client.sign_out(&token).await?;
        }
        self.mark_signed_out();
        Ok(())
    }

    pub(crate) fn mark_signed_out(&self) {
        self.state.send_replace(AuthState::default());
    }
}

/// Handle observing one identity's authentication state.
///
/// Exposes the `(user, is_authenticated)` pair; the subscription ends when
/// the observer is dropped, so a notification can never reach state that is
/// no longer watched.
#[derive(Clone)]
pub struct AuthStateObserver {
    rx: watch::Receiver<AuthState>,
}

impl AuthStateObserver {
    /// The current state.
    #[must_use]
    pub fn current(&self) -> AuthState {
        self.rx.borrow().clone()
    }

    /// Whether an identity is currently established.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.rx.borrow().is_authenticated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use gadget_grove_core::Email;

    fn client() -> AuthClient {
        AuthClient::new(
            "http://localhost:54321",
            SecretString::from("test-key".to_string()),
        )
    }

    fn session() -> Session {
        Session {
            access_token: SecretString::from("token".to_string()),
            user: AuthUser {
                id: UserId::new("u-1"),
                email: Email::parse("shopper@example.com").expect("email"),
            },
        }
    }

    #[test]
    fn established_session_is_authenticated() {
        let auth = AuthSession::establish(client(), &session());
        let observer = auth.observe();

        assert!(observer.is_authenticated());
        assert_eq!(observer.current().user_id(), Some(&UserId::new("u-1")));
    }

    #[test]
    fn sign_out_reaches_observers_synchronously() {
        let auth = AuthSession::establish(client(), &session());
        let observer = auth.observe();

        auth.mark_signed_out();

        assert!(!observer.is_authenticated());
        assert!(observer.current().user().is_none());
        assert!(observer.current().access_token().is_none());
    }

    #[test]
    fn observers_subscribed_after_sign_out_see_the_unauthenticated_state() {
        let auth = AuthSession::establish(client(), &session());
        auth.mark_signed_out();

        let late = auth.observe();
        assert!(!late.is_authenticated());
    }
}
