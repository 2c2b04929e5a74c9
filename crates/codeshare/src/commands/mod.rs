//! CLI command implementations

pub mod config;
pub mod link;
pub mod load;
pub mod share;
pub mod version;

use anyhow::{Context, Result};
use camino::Utf8Path;
use codeshare_core::{HierarchicalConfigLoader, RuntimeConfig, ShareSession};
use codeshare_store::PostgrestStore;

/// Resolve the runtime config, layering `explicit` over the global file
pub(crate) fn load_config(explicit: Option<&Utf8Path>) -> Result<RuntimeConfig> {
    let loader = HierarchicalConfigLoader::new()?;
    loader
        .load_runtime_config_with(explicit)
        .with_context(|| format!("Failed to load configuration from {}", loader.config_dir()))
}

/// Session against the configured backend
pub(crate) fn open_session(config: &RuntimeConfig) -> Result<ShareSession<PostgrestStore>> {
    let store = PostgrestStore::new(&config.backend)?;
    tracing::debug!(url = %store.table_url(), "using snippet backend");
    Ok(ShareSession::new(store, config))
}
