//! Runtime configuration types for operational parameters
//!
//! These types define configuration that controls runtime behavior: where
//! the snippet backend lives, how remote calls are retried, how share links
//! are built and how long to wait for the editor.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Operation name used for saving snippets
pub const SAVE_OPERATION: &str = "save";

/// Operation name used for loading snippets
pub const LOAD_OPERATION: &str = "load";

/// Complete runtime configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuntimeConfig {
    /// Snippet backend connection settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Retry policy configurations
    #[serde(default)]
    pub retry_policies: RetryPoliciesConfig,

    /// Share link settings
    #[serde(default)]
    pub share: ShareConfig,

    /// Editor defaults
    #[serde(default)]
    pub editor: EditorConfig,
}

/// Snippet backend (PostgREST / Supabase REST) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BackendConfig {
    /// Base URL of the backend project
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Anonymous API key sent with every request
    #[serde(default)]
    pub api_key: Option<String>,

    /// Database schema exposed by the REST API
    #[serde(default = "default_schema")]
    pub schema: String,

    /// Table holding snippets
    #[serde(default = "default_table")]
    pub table: String,

    /// Value of the x-application-name header
    #[serde(default = "default_application_name")]
    pub application_name: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            api_key: None,
            schema: default_schema(),
            table: default_table(),
            application_name: default_application_name(),
        }
    }
}

fn default_backend_url() -> String {
    "http://localhost:54321".to_string()
}
fn default_schema() -> String {
    "public".to_string()
}
fn default_table() -> String {
    "code_snippets".to_string()
}
fn default_application_name() -> String {
    "codeshare".to_string()
}

/// Retry policy configurations
///
/// Operations without an entry in `operations` use `default`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetryPoliciesConfig {
    /// Default retry policy
    #[serde(default)]
    pub default: RetryPolicy,

    /// Per-operation retry policies
    #[serde(default)]
    pub operations: HashMap<String, RetryPolicy>,
}

impl RetryPoliciesConfig {
    /// Policy for a named operation, falling back to the default policy
    pub fn policy_for(&self, operation: &str) -> &RetryPolicy {
        self.operations.get(operation).unwrap_or(&self.default)
    }
}

/// Retry policy for an operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Retry strategy
    #[serde(default)]
    pub strategy: RetryStrategy,

    /// Backoff multiplier for exponential strategies
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Delay after the first failed attempt, in milliseconds
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,

    /// Per-attempt timeout in milliseconds
    #[serde(default = "default_attempt_timeout")]
    pub attempt_timeout_ms: u64,
}

impl RetryPolicy {
    /// Per-attempt timeout as a `Duration`
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }

    /// Check the policy for values the executor cannot honor
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("max-attempts must be at least 1".to_string());
        }
        if self.attempt_timeout_ms == 0 {
            return Err("attempt-timeout-ms must be greater than 0".to_string());
        }
        if self.backoff_multiplier.is_nan() || self.backoff_multiplier < 1.0 {
            return Err(format!(
                "backoff-multiplier must be at least 1.0, got {}",
                self.backoff_multiplier
            ));
        }
        Ok(())
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            strategy: RetryStrategy::default(),
            backoff_multiplier: default_backoff_multiplier(),
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
            attempt_timeout_ms: default_attempt_timeout(),
        }
    }
}

fn default_max_attempts() -> u32 {
    5
}
fn default_backoff_multiplier() -> f64 {
    2.0
}
fn default_initial_delay() -> u64 {
    2000
}
fn default_max_delay() -> u64 {
    60000
}
fn default_attempt_timeout() -> u64 {
    10000
}

/// Retry strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RetryStrategy {
    /// Retry immediately
    None,

    /// Fixed delay between retries
    FixedDelay,

    /// Exponential backoff (default)
    #[default]
    ExponentialBackoff,

    /// Linear backoff
    LinearBackoff,
}

/// Share link configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ShareConfig {
    /// Origin that share links point at
    #[serde(default = "default_origin")]
    pub origin: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
        }
    }
}

fn default_origin() -> String {
    "http://localhost:4200".to_string()
}

/// Editor defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EditorConfig {
    /// Text shown in a fresh editor
    #[serde(default = "default_initial_value")]
    pub initial_value: String,

    /// Language recorded with shared snippets
    #[serde(default = "default_language")]
    pub language: String,

    /// How long a load waits for the editor to become available
    #[serde(default = "default_ready_timeout")]
    pub ready_timeout_ms: u64,
}

impl EditorConfig {
    /// Editor readiness wait as a `Duration`
    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            initial_value: default_initial_value(),
            language: default_language(),
            ready_timeout_ms: default_ready_timeout(),
        }
    }
}

fn default_initial_value() -> String {
    "// Start coding here...".to_string()
}
fn default_language() -> String {
    "javascript".to_string()
}
fn default_ready_timeout() -> u64 {
    5000
}
