//! Type definitions for codeshare configuration and snippets

mod runtime_config;
mod snippet;

pub use runtime_config::*;
pub use snippet::*;
