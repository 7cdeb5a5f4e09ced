//! Auth command implementation.
//!
//! This module manages the stored API key and tier.

use super::{connect, load_credentials};
use anyhow::{Context, Result};
use coinscope_lib::prelude::*;
use coinscope_lib::{API_KEY_ENV, TIER_ENV};
use inquire::{Password, PasswordDisplayMode, Select};

/// Store an API key and tier, prompting for whatever was not given.
pub(crate) fn set(key: Option<String>, tier: Option<Tier>) -> Result<()> {
    let tier = match tier {
        Some(tier) => tier,
        None => Select::new("Account tier:", Tier::all().to_vec())
            .prompt()
            .context("Tier selection cancelled")?,
    };

    let key = match key {
        Some(key) => key,
        None => Password::new("API key (leave empty for none):")
            .without_confirmation()
            .with_display_mode(PasswordDisplayMode::Masked)
            .prompt()
            .context("API key entry cancelled")?,
    };

    let key = key.trim();
    let credentials = if key.is_empty() {
        Credentials::anonymous(tier)
    } else {
        Credentials::new(key, tier)
    };

    let store = CredentialStore::with_default_path()?;
    store.save(&credentials)?;

    println!("Saved {tier} credentials to: {}", store.path().display());
    Ok(())
}

/// Show the effective credentials with the key masked.
pub(crate) fn show() -> Result<()> {
    let store = CredentialStore::with_default_path()?;
    let credentials = load_credentials()?;
    let endpoint = credentials.endpoint();

    println!("Store:    {}", store.path().display());
    println!("Tier:     {}", credentials.tier);
    println!(
        "API key:  {}",
        credentials.masked_key().unwrap_or_else(|| "(none)".to_string())
    );
    println!("Base URL: {}", endpoint.base_url);
    println!("Header:   {}", endpoint.auth_header);

    let overrides: Vec<&str> = [API_KEY_ENV, TIER_ENV]
        .into_iter()
        .filter(|name| std::env::var(name).is_ok_and(|v| !v.trim().is_empty()))
        .collect();
    if !overrides.is_empty() {
        println!("\nOverridden by environment: {}", overrides.join(", "));
    }

    Ok(())
}

/// Delete stored credentials.
pub(crate) fn clear() -> Result<()> {
    let store = CredentialStore::with_default_path()?;
    if store.clear()? {
        println!("Removed: {}", store.path().display());
    } else {
        println!("No stored credentials.");
    }
    Ok(())
}

/// Check the effective credentials with a ping.
pub(crate) async fn test() -> Result<()> {
    let client = connect()?;
    let reply = client.ping().await?;
    println!("OK ({} tier): {reply}", client.credentials().tier);
    Ok(())
}
