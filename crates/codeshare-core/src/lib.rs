//! # codeshare-core
//!
//! Core library for codeshare providing:
//! - Resilient execution of remote operations (bounded retries, exponential
//!   backoff, per-attempt timeouts)
//! - Runtime configuration (codeshare runtime.yaml) with layered loading
//! - Snippet model and the `SnippetStore` persistence seam
//! - Share links, editor readiness and the share session

pub mod config;
pub mod editor;
pub mod error;
pub mod retry;
pub mod session;
pub mod share;
pub mod store;
pub mod types;
pub mod utils;

pub use config::HierarchicalConfigLoader;
pub use editor::{Editor, EditorSlot, TextBuffer};
pub use error::{Error, Result};
pub use session::{SessionStatus, ShareSession};
pub use share::ShareLink;
pub use store::{MemoryStore, SnippetStore, StoreError};
pub use types::{NewSnippet, RuntimeConfig, Snippet, SnippetId};
