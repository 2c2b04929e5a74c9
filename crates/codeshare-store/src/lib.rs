//! # codeshare-store
//!
//! Remote snippet storage for codeshare. [`PostgrestStore`] talks to a
//! PostgREST endpoint (the REST layer Supabase exposes) and implements
//! `codeshare_core::SnippetStore`, so it plugs straight into a
//! `ShareSession` and its retrying executor.

mod postgrest;

pub use postgrest::{PostgrestStore, SNIPPET_COLUMNS};
