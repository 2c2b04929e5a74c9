//! Share links of the form `<origin>?share=<id>`

use std::fmt;
use url::Url;

use crate::error::{Error, Result};
use crate::types::SnippetId;

/// Query parameter carrying the snippet identifier
pub const SHARE_PARAM: &str = "share";

/// A link that opens a shared snippet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    origin: String,
    id: SnippetId,
}

impl ShareLink {
    /// Build a link for `id` under `origin`
    ///
    /// `origin` must be an absolute http(s) URL; a trailing slash is dropped.
    pub fn new(origin: &str, id: SnippetId) -> Result<Self> {
        let parsed = Url::parse(origin).map_err(|e| Error::invalid_link(origin, e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host().is_none() {
            return Err(Error::invalid_link(origin, "origin must be an http(s) URL"));
        }

        Ok(Self {
            origin: origin.trim_end_matches('/').to_string(),
            id,
        })
    }

    pub fn id(&self) -> &SnippetId {
        &self.id
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }
}

impl fmt::Display for ShareLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}?{}={}", self.origin, SHARE_PARAM, self.id)
    }
}

/// Extract the shared snippet id from a page URL, if it carries one
pub fn share_id_from_url(url: &Url) -> Option<SnippetId> {
    url.query_pairs()
        .find(|(key, _)| key == SHARE_PARAM)
        .and_then(|(_, value)| SnippetId::new(value.into_owned()).ok())
}
