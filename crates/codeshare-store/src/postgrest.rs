use async_trait::async_trait;
use chrono::{DateTime, Utc};
use codeshare_core::types::BackendConfig;
use codeshare_core::{Error, NewSnippet, Result, Snippet, SnippetId, SnippetStore, StoreError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, trace};
use url::Url;

/// Columns requested for every snippet row
pub const SNIPPET_COLUMNS: &str = "id,code,language,created_at";

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Client for a snippet table behind PostgREST
pub struct PostgrestStore {
    client: reqwest::Client,
    table_url: Url,
    schema: String,
}

impl PostgrestStore {
    /// Create a store for the configured backend
    ///
    /// Authentication and application headers are attached to every request.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let base = config.url.trim_end_matches('/');
        let table_url = Url::parse(&format!("{}/rest/v1/{}", base, config.table))
            .map_err(|e| Error::invalid_config(format!("backend url '{}': {}", config.url, e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-application-name"),
            header_value(&config.application_name)?,
        );
        if let Some(key) = &config.api_key {
            headers.insert(HeaderName::from_static("apikey"), header_value(key)?);
            headers.insert(AUTHORIZATION, header_value(&format!("Bearer {}", key))?);
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("codeshare/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::invalid_config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            table_url,
            schema: config.schema.clone(),
        })
    }

    /// Endpoint of the snippet table
    pub fn table_url(&self) -> &Url {
        &self.table_url
    }

    async fn error_for(response: Response) -> StoreError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        StoreError::Http {
            status: status.as_u16(),
            message: error_message(&body).unwrap_or_else(|| status.to_string()),
        }
    }
}

#[async_trait]
impl SnippetStore for PostgrestStore {
    async fn insert(&self, snippet: NewSnippet) -> std::result::Result<Snippet, StoreError> {
        debug!(url = %self.table_url, bytes = snippet.code.len(), "inserting snippet");

        let mut url = self.table_url.clone();
        url.query_pairs_mut().append_pair("select", SNIPPET_COLUMNS);

        let response = self
            .client
            .post(url)
            .header("Prefer", "return=representation")
            .header("Content-Profile", &self.schema)
            .json(&[&snippet])
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        let rows: Vec<SnippetRow> = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        trace!(rows = rows.len(), "insert response");

        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("insert returned no rows".to_string()))?
            .into_snippet()
    }

    async fn fetch_by_id(&self, id: &SnippetId) -> std::result::Result<Snippet, StoreError> {
        let mut url = self.table_url.clone();
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{}", id))
            .append_pair("select", SNIPPET_COLUMNS);
        debug!(url = %url, "fetching snippet");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, SINGLE_OBJECT)
            .header("Accept-Profile", &self.schema)
            .send()
            .await
            .map_err(transport)?;

        // A single-object request matching zero rows answers 406
        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::NOT_ACCEPTABLE => {
                return Err(StoreError::not_found(id))
            }
            status if !status.is_success() => return Err(Self::error_for(response).await),
            _ => {}
        }

        let row: SnippetRow = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        row.into_snippet()
    }
}

/// Row shape as returned by the backend; `id` may be text or numeric
#[derive(Debug, Deserialize)]
struct SnippetRow {
    id: serde_json::Value,
    code: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl SnippetRow {
    fn into_snippet(self) -> std::result::Result<Snippet, StoreError> {
        let raw = match self.id {
            serde_json::Value::String(s) => s,
            serde_json::Value::Number(n) => n.to_string(),
            other => return Err(StoreError::Decode(format!("unexpected id {}", other))),
        };
        let id = SnippetId::new(raw).map_err(|e| StoreError::Decode(e.to_string()))?;

        Ok(Snippet {
            id,
            code: self.code,
            language: self.language,
            created_at: self.created_at,
        })
    }
}

fn transport(err: reqwest::Error) -> StoreError {
    StoreError::Transport(err.to_string())
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| Error::invalid_config("backend header contains invalid characters"))
}

/// PostgREST error bodies carry a `message` field
fn error_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }

    if body.is_empty() {
        return None;
    }
    Some(
        serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.message)
            .unwrap_or_else(|_| body.to_string()),
    )
}
