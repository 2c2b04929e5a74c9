//! Share session
//!
//! A session ties one editor to the snippet store. It is the only consumer
//! of the resilient executor: saving and loading each run the store call
//! under their configured retry policy and turn exhausted retries into a
//! user-facing message, leaving the session ready for another try.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use url::Url;

use crate::editor::EditorSlot;
use crate::error::{Error, Result};
use crate::retry::{ResilientExecutorBuilder, TracingObserver};
use crate::share::{share_id_from_url, ShareLink};
use crate::store::SnippetStore;
use crate::types::{
    NewSnippet, RetryPolicy, RuntimeConfig, Snippet, SnippetId, LOAD_OPERATION, SAVE_OPERATION,
};

/// Shown when saving fails after all retries
pub const SHARE_FAILED_MESSAGE: &str = "Failed to share code. Please try again.";

/// Shown when loading fails after all retries
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load shared code";

/// Snapshot of a session's visible state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStatus {
    /// Identifier of the snippet last shared or opened
    pub share_id: Option<SnippetId>,
    /// Whether a save or load is running
    pub loading: bool,
    /// Message describing the last failure, cleared when a new operation starts
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct SessionState {
    share_id: Option<SnippetId>,
    error: Option<String>,
}

/// Counts one running save or load; the session is loading while any is held
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    /// Start an operation only when nothing else is running
    fn exclusive(count: &'a AtomicUsize) -> Result<Self> {
        count
            .compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::Busy)?;
        Ok(Self(count))
    }

    /// Start an operation alongside whatever is already running
    fn join(count: &'a AtomicUsize) -> Self {
        count.fetch_add(1, Ordering::AcqRel);
        Self(count)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// One editor's connection to the snippet store
pub struct ShareSession<S> {
    store: S,
    save_policy: RetryPolicy,
    load_policy: RetryPolicy,
    origin: String,
    editor_wait: Duration,
    editor: EditorSlot,
    in_flight: AtomicUsize,
    state: Mutex<SessionState>,
}

impl<S: SnippetStore> ShareSession<S> {
    /// Create a session with an empty editor slot
    pub fn new(store: S, config: &RuntimeConfig) -> Self {
        Self {
            store,
            save_policy: config.retry_policies.policy_for(SAVE_OPERATION).clone(),
            load_policy: config.retry_policies.policy_for(LOAD_OPERATION).clone(),
            origin: config.share.origin.clone(),
            editor_wait: config.editor.ready_timeout(),
            editor: EditorSlot::new(),
            in_flight: AtomicUsize::new(0),
            state: Mutex::new(SessionState::default()),
        }
    }

    /// The slot the editor is installed into once it has initialized
    pub fn editor(&self) -> &EditorSlot {
        &self.editor
    }

    /// The store snippets are saved to and loaded from
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current share id, loading flag and error message
    pub fn status(&self) -> SessionStatus {
        let state = self.state();
        SessionStatus {
            share_id: state.share_id.clone(),
            loading: self.in_flight.load(Ordering::Acquire) > 0,
            error: state.error.clone(),
        }
    }

    /// Identifier of the snippet last shared or opened
    pub fn share_id(&self) -> Option<SnippetId> {
        self.state().share_id.clone()
    }

    /// Start-up path: load the snippet named by `?share=<id>`, if any
    pub async fn open(&self, page: &Url) -> Result<Option<Snippet>> {
        let Some(id) = share_id_from_url(page) else {
            return Ok(None);
        };

        self.state().share_id = Some(id.clone());
        self.load_shared_code(&id).await.map(Some)
    }

    /// Save the editor's current text and remember its new identifier
    ///
    /// Refused with `Error::Busy` while another save or load is running.
    pub async fn share_code(&self) -> Result<SnippetId> {
        let _in_flight = InFlight::exclusive(&self.in_flight)?;
        self.state().error = None;

        let editor = match self.editor.wait_ready(self.editor_wait).await {
            Ok(editor) => editor,
            Err(err) => {
                self.state().error = Some(SHARE_FAILED_MESSAGE.to_string());
                return Err(err);
            }
        };
        let snippet = NewSnippet::new(editor.value(), editor.language());

        let executor = ResilientExecutorBuilder::new()
            .with_policy(self.save_policy.clone())
            .with_observer(TracingObserver::new(SAVE_OPERATION))
            .build();
        let store = &self.store;

        match executor.execute(|| store.insert(snippet.clone())).await {
            Ok(saved) => {
                tracing::info!(id = %saved.id, "snippet shared");
                self.state().share_id = Some(saved.id.clone());
                Ok(saved.id)
            }
            Err(source) => {
                tracing::error!(error = %source, "error sharing code");
                self.state().error = Some(SHARE_FAILED_MESSAGE.to_string());
                Err(Error::ShareFailed {
                    message: SHARE_FAILED_MESSAGE.to_string(),
                    source,
                })
            }
        }
    }

    /// Fetch a snippet and put its text into the editor
    ///
    /// The editor may still be initializing; the load waits for it up to the
    /// configured readiness timeout. A load may run while a save is in
    /// progress.
    pub async fn load_shared_code(&self, id: &SnippetId) -> Result<Snippet> {
        let _in_flight = InFlight::join(&self.in_flight);
        self.state().error = None;

        let executor = ResilientExecutorBuilder::new()
            .with_policy(self.load_policy.clone())
            .with_observer(TracingObserver::new(LOAD_OPERATION))
            .build();
        let store = &self.store;

        let snippet = match executor.execute(|| store.fetch_by_id(id)).await {
            Ok(snippet) => snippet,
            Err(source) => {
                tracing::error!(id = %id, error = %source, "error loading code");
                self.state().error = Some(LOAD_FAILED_MESSAGE.to_string());
                return Err(Error::LoadFailed {
                    message: LOAD_FAILED_MESSAGE.to_string(),
                    source,
                });
            }
        };

        let editor = match self.editor.wait_ready(self.editor_wait).await {
            Ok(editor) => editor,
            Err(err) => {
                self.state().error = Some(LOAD_FAILED_MESSAGE.to_string());
                return Err(err);
            }
        };
        editor.set_value(&snippet.code);

        tracing::debug!(id = %id, bytes = snippet.code.len(), "snippet loaded");
        Ok(snippet)
    }

    /// Link for the current snippet, if one has been shared or opened
    pub fn share_link(&self) -> Result<Option<ShareLink>> {
        self.share_id()
            .map(|id| ShareLink::new(&self.origin, id))
            .transpose()
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
