//! Common test infrastructure for codeshare-store tests
//!
//! - `constants`: keys, ids and snippet text shared by the tests
//! - `mock_server`: wiremock setups for the PostgREST snippet table

#![allow(dead_code)]

pub mod constants;
pub mod mock_server;

pub use constants::*;
pub use mock_server::*;

use codeshare_core::types::{BackendConfig, RetryPolicy, RetryStrategy};
use codeshare_core::RuntimeConfig;
use codeshare_store::PostgrestStore;
use wiremock::MockServer;

/// Backend settings pointing at a mock server
pub fn backend_for(server: &MockServer) -> BackendConfig {
    BackendConfig {
        url: server.uri(),
        api_key: Some(TEST_API_KEY.to_string()),
        ..BackendConfig::default()
    }
}

/// Store pointing at a mock server
pub fn store_for(server: &MockServer) -> PostgrestStore {
    PostgrestStore::new(&backend_for(server)).unwrap()
}

/// Runtime config with short fixed retries against a mock server
pub fn quick_config(server: &MockServer) -> RuntimeConfig {
    let mut config = RuntimeConfig::default();
    config.backend = backend_for(server);
    config.share.origin = TEST_ORIGIN.to_string();
    config.retry_policies.default = RetryPolicy {
        max_attempts: 3,
        strategy: RetryStrategy::FixedDelay,
        initial_delay_ms: 10,
        attempt_timeout_ms: 2000,
        ..RetryPolicy::default()
    };
    config
}
