//! Session-stored types and the transient notice shape.

use serde::{Deserialize, Serialize};

use gadget_grove_core::{Email, UserId};

/// Session-stored admin identity.
///
/// Holding this only proves a sign-in happened; the role gate re-verifies
/// the profile role on every privileged request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's remote-store ID.
    pub id: UserId,
    /// Admin's email address.
    pub email: Email,
    /// Access token for the remote store.
    pub access_token: String,
}

/// Session keys for authentication data.
pub mod session_keys {
    /// Key for storing the signed-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A transient user-visible notice; one per operation, success or failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    /// A success notice.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// A failure notice.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}
