//! Shared constants for test infrastructure

pub const TEST_API_KEY: &str = "test-anon-key";
pub const TEST_ORIGIN: &str = "https://codeshare.dev";
pub const TABLE_PATH: &str = "/rest/v1/code_snippets";

pub const SNIPPET_ID: &str = "4f1c9a2e-7b3d-4c5e-9f60-1a2b3c4d5e6f";
pub const SNIPPET_CODE: &str = "fn main() {\n    println!(\"hello\");\n}\n";
pub const SNIPPET_LANGUAGE: &str = "rust";
pub const CREATED_AT: &str = "2026-03-01T12:00:00Z";
