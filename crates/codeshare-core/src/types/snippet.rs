//! Snippet records as stored by the backend

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::share::share_id_from_url;

/// Identifier of a stored snippet, as carried in `?share=<id>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SnippetId(String);

impl SnippetId {
    /// Validate and wrap an identifier
    ///
    /// Identifiers must be non-empty and limited to `[A-Za-z0-9_-]` so they
    /// can be embedded in a link without escaping.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(Self(id))
        } else {
            Err(Error::invalid_snippet_id(id))
        }
    }

    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Accept either a bare identifier or a full share link
    pub fn from_link_or_id(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.contains("://") {
            let url = url::Url::parse(input)
                .map_err(|e| Error::invalid_link(input, e.to_string()))?;
            return share_id_from_url(&url)
                .ok_or_else(|| Error::invalid_link(input, "missing share parameter"));
        }
        Self::new(input)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SnippetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SnippetId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for SnippetId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<SnippetId> for String {
    fn from(id: SnippetId) -> Self {
        id.0
    }
}

/// A snippet about to be inserted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSnippet {
    pub code: String,
    pub language: String,
}

impl NewSnippet {
    pub fn new(code: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
        }
    }
}

/// A stored snippet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: SnippetId,
    pub code: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
