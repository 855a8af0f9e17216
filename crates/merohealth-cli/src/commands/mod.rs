pub mod auth;
pub mod caregiver;
pub mod config;
pub mod device;
pub mod medication;
pub mod reminder;
pub mod schedule;

use std::sync::Arc;

use merohealth_core::{ApiClient, Config, KeyringTokenStore};

/// Build an API client against the configured backend, with tokens in
/// the OS keyring.
pub(crate) fn client(config: &Config) -> Result<ApiClient, Box<dyn std::error::Error>> {
    Ok(ApiClient::new(config, Arc::new(KeyringTokenStore::new()))?)
}
