//! Admin authentication and the role gate.
//!
//! Entry to the panel requires both a valid sign-in and an `admin` role on
//! the user's profile row. The role is read with an explicit authorization
//! query before any privileged operation; the result lives only for the
//! request that asked. A sign-in that fails the gate is revoked on the spot,
//! so no authenticated-but-unauthorized session is ever left standing.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use tracing::instrument;

use gadget_grove_core::{Email, Role, UserId};
use gadget_grove_remote_store::{AuthClient, AuthError, Session, StoreClient, StoreError, rows};

/// Errors from the admin login/gate path.
#[derive(Debug, thiserror::Error)]
pub enum AdminAuthError {
    /// The auth plane rejected the sign-in (or sign-out).
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The role lookup itself failed.
    #[error("role lookup failed: {0}")]
    RoleCheck(#[from] StoreError),

    /// Signed in, but the profile role is not `admin`.
    #[error("admin access required")]
    NotAdmin,
}

/// Port for the auth-plane operations the gate needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Sign in with email and password.
    async fn sign_in(&self, email: &Email, password: &str) -> Result<Session, AuthError>;

    /// Revoke a session.
    async fn sign_out(&self, access_token: &SecretString) -> Result<(), AuthError>;
}

#[async_trait]
impl AuthGateway for AuthClient {
    async fn sign_in(&self, email: &Email, password: &str) -> Result<Session, AuthError> {
        Self::sign_in(self, email, password).await
    }

    async fn sign_out(&self, access_token: &SecretString) -> Result<(), AuthError> {
        Self::sign_out(self, access_token).await
    }
}

/// Port for the single-row profile role lookup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// The role on `user`'s profile row. A missing row reads as
    /// [`Role::Customer`]: absence can never grant access.
    async fn fetch_role(
        &self,
        access_token: &SecretString,
        user: &UserId,
    ) -> Result<Role, StoreError>;
}

/// Production adapter over the `profiles` table.
pub struct RemoteRoleStore {
    store: StoreClient,
}

impl RemoteRoleStore {
    #[must_use]
    pub const fn new(store: StoreClient) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RoleStore for RemoteRoleStore {
    async fn fetch_role(
        &self,
        access_token: &SecretString,
        user: &UserId,
    ) -> Result<Role, StoreError> {
        let result = self
            .store
            .from(rows::PROFILES_TABLE)
            .select("*")
            .eq("id", user)
            .fetch_one::<rows::ProfileRow>(Some(access_token))
            .await;
        match result {
            Ok(profile) => Ok(profile.role),
            Err(StoreError::NotFound(_)) => Ok(Role::Customer),
            Err(other) => Err(other),
        }
    }
}

/// The admin login flow and per-request role gate.
pub struct AdminAuthService {
    auth: Arc<dyn AuthGateway>,
    roles: Arc<dyn RoleStore>,
}

impl AdminAuthService {
    /// Create the service over its two ports.
    #[must_use]
    pub fn new(auth: Arc<dyn AuthGateway>, roles: Arc<dyn RoleStore>) -> Self {
        Self { auth, roles }
    }

    /// Sign in and verify the admin role.
    ///
    /// # Errors
    ///
    /// Returns [`AdminAuthError::NotAdmin`] (after revoking the fresh
    /// session) when the profile role is not `admin`; the session is also
    /// revoked when the role lookup itself fails, since an unverifiable
    /// session must not survive either.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &Email, password: &str) -> Result<Session, AdminAuthError> {
        let session = self.auth.sign_in(email, password).await?;

        let role = match self
            .roles
            .fetch_role(&session.access_token, &session.user.id)
            .await
        {
            Ok(role) => role,
            Err(err) => {
                self.revoke(&session.access_token).await;
                return Err(AdminAuthError::RoleCheck(err));
            }
        };

        if !role.is_admin() {
            self.revoke(&session.access_token).await;
            return Err(AdminAuthError::NotAdmin);
        }

        Ok(session)
    }

    /// Re-verify the admin role for a held token.
    ///
    /// Called per privileged request; nothing is cached beyond that request.
    ///
    /// # Errors
    ///
    /// Returns [`AdminAuthError::NotAdmin`] if the role no longer passes, or
    /// the lookup's store error.
    pub async fn verify(
        &self,
        access_token: &SecretString,
        user: &UserId,
    ) -> Result<(), AdminAuthError> {
        let role = self.roles.fetch_role(access_token, user).await?;
        if role.is_admin() {
            Ok(())
        } else {
            Err(AdminAuthError::NotAdmin)
        }
    }

    /// Sign out the admin's session.
    ///
    /// # Errors
    ///
    /// Returns the auth-plane error if revocation fails.
    pub async fn logout(&self, access_token: &SecretString) -> Result<(), AdminAuthError> {
        self.auth.sign_out(access_token).await?;
        Ok(())
    }

    async fn revoke(&self, access_token: &SecretString) {
        if let Err(err) = self.auth.sign_out(access_token).await {
            tracing::warn!(error = %err, "Failed to revoke rejected admin session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use gadget_grove_remote_store::AuthUser;

    fn email() -> Email {
        Email::parse("staff@example.com").expect("email")
    }

    fn session() -> Session {
        Session {
            access_token: SecretString::from("token".to_string()),
            user: AuthUser {
                id: UserId::new("u-1"),
                email: email(),
            },
        }
    }

    fn gateway_signing_in() -> MockAuthGateway {
        let mut gateway = MockAuthGateway::new();
        gateway
            .expect_sign_in()
            .times(1)
            .returning(|_, _| Ok(session()));
        gateway
    }

    #[tokio::test]
    async fn admin_role_passes_the_gate_without_a_sign_out() {
        let mut gateway = gateway_signing_in();
        gateway.expect_sign_out().times(0);

        let mut roles = MockRoleStore::new();
        roles
            .expect_fetch_role()
            .times(1)
            .returning(|_, _| Ok(Role::Admin));

        let service = AdminAuthService::new(Arc::new(gateway), Arc::new(roles));
        let session = service.login(&email(), "secret-pw").await.expect("login");
        assert_eq!(session.user.id, UserId::new("u-1"));
    }

    #[tokio::test]
    async fn non_admin_login_is_signed_out_immediately() {
        let mut gateway = gateway_signing_in();
        gateway.expect_sign_out().times(1).returning(|_| Ok(()));

        let mut roles = MockRoleStore::new();
        roles
            .expect_fetch_role()
            .times(1)
            .returning(|_, _| Ok(Role::Customer));

        let service = AdminAuthService::new(Arc::new(gateway), Arc::new(roles));
        let result = service.login(&email(), "secret-pw").await;

        assert!(matches!(result, Err(AdminAuthError::NotAdmin)));
    }

    #[tokio::test]
    async fn an_unverifiable_session_is_also_revoked() {
        let mut gateway = gateway_signing_in();
        gateway.expect_sign_out().times(1).returning(|_| Ok(()));

        let mut roles = MockRoleStore::new();
        roles.expect_fetch_role().times(1).returning(|_, _| {
            Err(StoreError::Api {
                status: 503,
                message: "unavailable".to_string(),
            })
        });

        let service = AdminAuthService::new(Arc::new(gateway), Arc::new(roles));
        let result = service.login(&email(), "secret-pw").await;

        assert!(matches!(result, Err(AdminAuthError::RoleCheck(_))));
    }

    #[tokio::test]
    async fn bad_credentials_never_reach_the_role_store() {
        let mut gateway = MockAuthGateway::new();
        gateway
            .expect_sign_in()
            .times(1)
            .returning(|_, _| Err(AuthError::InvalidCredentials));
        gateway.expect_sign_out().times(0);

        let mut roles = MockRoleStore::new();
        roles.expect_fetch_role().times(0);

        let service = AdminAuthService::new(Arc::new(gateway), Arc::new(roles));
        let result = service.login(&email(), "wrong-pw").await;

        assert!(matches!(
            result,
            Err(AdminAuthError::Auth(AuthError::InvalidCredentials))
        ));
    }

    #[tokio::test]
    async fn verify_rechecks_the_role_every_time() {
        let mut roles = MockRoleStore::new();
        roles
            .expect_fetch_role()
            .times(2)
            .returning(|_, _| Ok(Role::Admin));

        let service = AdminAuthService::new(Arc::new(MockAuthGateway::new()), Arc::new(roles));
        let token = SecretString::from("token".to_string());
        let user = UserId::new("u-1");

        service.verify(&token, &user).await.expect("first check");
        service.verify(&token, &user).await.expect("second check");
    }
}
