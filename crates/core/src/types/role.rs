//! Profile roles.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Role attached to a user profile.
///
/// Stored in the remote `profiles` table and consulted by the admin role
/// gate. Unknown role strings deserialize as [`Role::Customer`] so a stray
/// value in the store can never grant access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May manage the product catalog.
    Admin,
    /// Regular shopper.
    #[default]
    #[serde(other)]
    Customer,
}

impl Role {
    /// Whether this role passes the admin gate.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// The role as stored in the `profiles` table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Customer => "customer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
