//! CLI command implementations.

pub mod profile;
pub mod seed;

use secrecy::SecretString;

use gadget_grove_remote_store::StoreClient;

/// Build a store client from the environment, using the service-role key.
///
/// # Errors
///
/// Returns an error if `REMOTE_STORE_URL` or `REMOTE_STORE_SERVICE_KEY` is
/// not set.
pub fn store_from_env() -> Result<StoreClient, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let url = std::env::var("REMOTE_STORE_URL").map_err(|_| "REMOTE_STORE_URL not set")?;
    let service_key = std::env::var("REMOTE_STORE_SERVICE_KEY")
        .map(SecretString::from)
        .map_err(|_| "REMOTE_STORE_SERVICE_KEY not set")?;

    Ok(StoreClient::new(url, service_key))
}
