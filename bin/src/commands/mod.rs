//! CLI command implementations.

pub(crate) mod auth;
pub(crate) mod history;
pub(crate) mod markets;
pub(crate) mod price;
pub(crate) mod search;

use anyhow::{Context, Result};
use coinscope_lib::prelude::*;
use tracing::debug;

/// Load the effective credentials: stored values with environment overrides.
pub(crate) fn load_credentials() -> Result<Credentials> {
    let store = CredentialStore::with_default_path()?;
    let credentials = store
        .load_with_env()
        .with_context(|| format!("Failed to load credentials from {}", store.path().display()))?;
    debug!(tier = %credentials.tier, keyed = credentials.api_key().is_some(), "loaded credentials");
    Ok(credentials)
}

/// Build an API client from the effective credentials.
pub(crate) fn connect() -> Result<ApiClient> {
    let credentials = load_credentials()?;
    ApiClient::with_defaults(credentials).context("Failed to create HTTP client")
}
