//! Bootstrap: first-start checks and API-key seeding.
//!
//! When catalogd starts:
//! 1. Verify the config is usable; if not, refuse to start.
//! 2. Insert every configured API key that is not yet in the key table.

use std::collections::HashSet;

use catalog::gateway::ApiKeyGateway;
use catalog_sql::SQLStore;
use tracing::{info, warn};

use crate::config::ServerConfig;

/// Verify server configuration is ready for use.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.storage.data_dir.trim().is_empty() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }

    let mut usernames = HashSet::new();
    let mut keys = HashSet::new();
    for entry in &config.api_keys {
        if entry.username.trim().is_empty() || entry.key.trim().is_empty() {
            anyhow::bail!("API key entries need both a username and a key.");
        }
        if !usernames.insert(entry.username.as_str()) {
            anyhow::bail!("Duplicate API key username '{}' in configuration.", entry.username);
        }
        if !keys.insert(entry.key.as_str()) {
            anyhow::bail!("Duplicate API key for user '{}' in configuration.", entry.username);
        }
    }
    Ok(())
}

/// Insert configured keys that are missing. Returns how many were added.
pub fn seed_api_keys(sql: &dyn SQLStore, config: &ServerConfig) -> anyhow::Result<usize> {
    let gateway = ApiKeyGateway::new(sql);
    let mut added = 0;

    for entry in &config.api_keys {
        match gateway.get_by_username(&entry.username)? {
            Some(existing) if existing.col_apikey == entry.key => {
                info!("API key for '{}' already exists", entry.username);
            }
            Some(_) => {
                warn!(
                    "API key for '{}' differs from configuration; keeping the stored key",
                    entry.username
                );
            }
            None => {
                gateway.insert(&entry.username, &entry.key)?;
                info!("Created API key for '{}'", entry.username);
                added += 1;
            }
        }
    }

    if config.api_keys.is_empty() {
        warn!("No API keys configured; only keys already in the store will be accepted");
    }
    Ok(added)
}
