//! Snippet persistence seam
//!
//! `SnippetStore` is the request/response shape of the remote backend as the
//! executor sees it: every call either returns a value or fails. Transport
//! details live in implementations (see the `codeshare-store` crate).

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

use crate::types::{NewSnippet, Snippet, SnippetId};

/// Errors reported by a snippet store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No snippet exists for the identifier
    #[error("snippet {id} not found")]
    NotFound { id: String },

    /// The backend answered with a non-success status
    #[error("backend returned {status}: {message}")]
    Http { status: u16, message: String },

    /// The request never produced a response
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend response could not be understood
    #[error("malformed backend response: {0}")]
    Decode(String),
}

impl StoreError {
    /// Create a not-found error for `id`
    pub fn not_found(id: &SnippetId) -> Self {
        Self::NotFound { id: id.to_string() }
    }

    /// Whether the backend reported the snippet missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Remote persistence service for snippets
#[async_trait]
pub trait SnippetStore: Send + Sync {
    /// Store a snippet and return it with its generated identifier
    async fn insert(&self, snippet: NewSnippet) -> Result<Snippet, StoreError>;

    /// Fetch a snippet by identifier
    async fn fetch_by_id(&self, id: &SnippetId) -> Result<Snippet, StoreError>;
}

#[async_trait]
impl<S: SnippetStore + ?Sized> SnippetStore for std::sync::Arc<S> {
    async fn insert(&self, snippet: NewSnippet) -> Result<Snippet, StoreError> {
        (**self).insert(snippet).await
    }

    async fn fetch_by_id(&self, id: &SnippetId) -> Result<Snippet, StoreError> {
        (**self).fetch_by_id(id).await
    }
}

/// In-process store, used for tests and offline sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    snippets: RwLock<HashMap<SnippetId, Snippet>>,
}

impl MemoryStore {
    /// An empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored snippets
    pub fn len(&self) -> usize {
        self.snippets.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SnippetStore for MemoryStore {
    async fn insert(&self, snippet: NewSnippet) -> Result<Snippet, StoreError> {
        let stored = Snippet {
            id: SnippetId::generate(),
            code: snippet.code,
            language: Some(snippet.language),
            created_at: Some(Utc::now()),
        };

        self.snippets
            .write()
            .map_err(|_| StoreError::Transport("memory store poisoned".to_string()))?
            .insert(stored.id.clone(), stored.clone());

        Ok(stored)
    }

    async fn fetch_by_id(&self, id: &SnippetId) -> Result<Snippet, StoreError> {
        self.snippets
            .read()
            .map_err(|_| StoreError::Transport("memory store poisoned".to_string()))?
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(id))
    }
}
