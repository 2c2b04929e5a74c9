//! Hierarchical configuration loader with precedence
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. Global config (~/.codeshare/runtime.yaml)
//! 3. Explicit config file (`--config`)
//! 4. Environment variables (CODESHARE_* prefix)

use crate::error::{Error, Result};
use crate::share::ShareLink;
use crate::types::{RuntimeConfig, SnippetId};
use crate::utils::get_home_dir;
use camino::{Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;
use serde_yaml_ng::Value;
use std::env;
use std::fs;
use url::Url;

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/embedded/config/"]
#[prefix = ""]
struct EmbeddedConfigs;

/// Name of the global runtime config file inside the config directory
pub const RUNTIME_CONFIG_FILE: &str = "runtime.yaml";

/// Configuration hierarchy loader
pub struct HierarchicalConfigLoader {
    /// Base directory for configuration files
    config_dir: Utf8PathBuf,
}

impl HierarchicalConfigLoader {
    /// Create a loader for the standard config directory (~/.codeshare)
    pub fn new() -> Result<Self> {
        let home = Utf8PathBuf::from_path_buf(get_home_dir()?)
            .map_err(|_| Error::invalid_config("Home directory is not valid UTF-8"))?;
        Ok(Self {
            config_dir: home.join(".codeshare"),
        })
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: Utf8PathBuf) -> Self {
        Self { config_dir }
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    /// Load runtime configuration with hierarchical precedence
    pub fn load_runtime_config(&self) -> Result<RuntimeConfig> {
        self.load_runtime_config_with(None)
    }

    /// Load runtime configuration, layering `explicit` above the global file
    ///
    /// An explicit file must exist; the global file is optional. Each layer
    /// only overrides the keys it sets.
    pub fn load_runtime_config_with(&self, explicit: Option<&Utf8Path>) -> Result<RuntimeConfig> {
        let mut merged = Self::load_embedded_config("runtime-defaults.yaml")?;

        let global_path = self.config_dir.join(RUNTIME_CONFIG_FILE);
        if global_path.exists() {
            tracing::debug!(path = %global_path, "loading global runtime config");
            Self::merge_values(&mut merged, Self::load_yaml_file(&global_path)?);
        }

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::config_not_found(path.as_str()));
            }
            tracing::debug!(path = %path, "loading runtime config");
            Self::merge_values(&mut merged, Self::load_yaml_file(path)?);
        }

        let config: RuntimeConfig = serde_yaml_ng::from_value(merged)
            .map_err(|e| Error::invalid_config(format!("Invalid runtime config: {}", e)))?;

        let config = Self::apply_env_overrides(config)?;
        Self::validate(&config)?;

        Ok(config)
    }

    /// Load an embedded configuration file
    fn load_embedded_config(filename: &str) -> Result<Value> {
        let embedded_file = EmbeddedConfigs::get(filename).ok_or_else(|| {
            Error::config_not_found(format!("Embedded config not found: {}", filename))
        })?;

        let content = std::str::from_utf8(&embedded_file.data).map_err(|_| {
            Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", filename))
        })?;

        serde_yaml_ng::from_str(content).map_err(|e| {
            Error::invalid_config(format!(
                "Failed to parse embedded config {}: {}",
                filename, e
            ))
        })
    }

    /// Load a YAML file without interpreting it yet
    fn load_yaml_file(path: &Utf8Path) -> Result<Value> {
        let content = fs::read_to_string(path)?;
        serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))
    }

    /// Merge `overlay` into `base` key by key
    ///
    /// Mappings merge recursively; any other overlay value replaces the base
    /// value. An empty overlay document changes nothing.
    fn merge_values(base: &mut Value, overlay: Value) {
        match (base, overlay) {
            (_, Value::Null) => {}
            (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
                for (key, value) in overlay_map {
                    match base_map.get_mut(&key) {
                        Some(existing) => Self::merge_values(existing, value),
                        None => {
                            base_map.insert(key, value);
                        }
                    }
                }
            }
            (base, overlay) => *base = overlay,
        }
    }

    /// Apply environment variable overrides to runtime config
    fn apply_env_overrides(mut config: RuntimeConfig) -> Result<RuntimeConfig> {
        if let Ok(val) = env::var("CODESHARE_BACKEND_URL") {
            config.backend.url = val;
        }

        if let Ok(val) = env::var("CODESHARE_API_KEY") {
            config.backend.api_key = Some(val);
        }

        if let Ok(val) = env::var("CODESHARE_SHARE_ORIGIN") {
            config.share.origin = val;
        }

        // Retry overrides apply to every policy
        let policies = &mut config.retry_policies;
        let all_policies =
            std::iter::once(&mut policies.default).chain(policies.operations.values_mut());

        let max_attempts = parse_env::<u32>("CODESHARE_MAX_ATTEMPTS")?;
        let retry_delay = parse_env::<u64>("CODESHARE_RETRY_DELAY_MS")?;
        let attempt_timeout = parse_env::<u64>("CODESHARE_ATTEMPT_TIMEOUT_MS")?;

        for policy in all_policies {
            if let Some(val) = max_attempts {
                policy.max_attempts = val;
            }
            if let Some(val) = retry_delay {
                policy.initial_delay_ms = val;
            }
            if let Some(val) = attempt_timeout {
                policy.attempt_timeout_ms = val;
            }
        }

        Ok(config)
    }

    /// Reject configurations the session cannot run with
    fn validate(config: &RuntimeConfig) -> Result<()> {
        let policies = &config.retry_policies;
        let named = std::iter::once(("default", &policies.default))
            .chain(policies.operations.iter().map(|(k, v)| (k.as_str(), v)));
        for (name, policy) in named {
            policy
                .validate()
                .map_err(|e| Error::invalid_config(format!("retry policy '{}': {}", name, e)))?;
        }

        Url::parse(&config.backend.url).map_err(|e| {
            Error::invalid_config(format!("backend url '{}': {}", config.backend.url, e))
        })?;
        ShareLink::new(&config.share.origin, SnippetId::generate()).map_err(|e| {
            Error::invalid_config(format!("share origin '{}': {}", config.share.origin, e))
        })?;

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(val) => val
            .parse()
            .map(Some)
            .map_err(|_| Error::invalid_config(format!("{} must be a valid number", name))),
        Err(_) => Ok(None),
    }
}
