//! Set a profile's role.

use tracing::info;

use gadget_grove_core::{Role, UserId};
use gadget_grove_remote_store::rows::{self, RolePatch};

use super::store_from_env;

/// Update the role on a user's profile row.
///
/// # Errors
///
/// Returns an error for an unknown role name, an incomplete environment, or
/// a failed remote call.
pub async fn promote(user_id: &str, role: &str) -> Result<(), Box<dyn std::error::Error>> {
    let role = parse_role(role)?;
    let user_id = UserId::new(user_id);
    let store = store_from_env()?;

    store
        .from(rows::PROFILES_TABLE)
        .eq("id", &user_id)
        .update(&RolePatch { role }, None)
        .await?;

    info!(%user_id, %role, "Profile role updated");
    Ok(())
}

fn parse_role(raw: &str) -> Result<Role, String> {
    match raw {
        "admin" => Ok(Role::Admin),
        "customer" => Ok(Role::Customer),
        other => Err(format!("unknown role '{other}' (expected admin or customer)")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_parse() {
        assert_eq!(parse_role("admin"), Ok(Role::Admin));
        assert_eq!(parse_role("customer"), Ok(Role::Customer));
        assert!(parse_role("superuser").is_err());
    }
}
