//! Editor seam and readiness
//!
//! The editing widget is opaque: codeshare only reads and replaces its whole
//! value. Editors may become available some time after a session starts, so
//! sessions hold an `EditorSlot` that resolves once an editor is installed.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio::sync::watch;

use crate::error::{Error, Result};
use crate::types::EditorConfig;

/// A text editor whose whole value can be read and replaced
pub trait Editor: Send + Sync {
    /// Current text
    fn value(&self) -> String;

    /// Replace the text
    fn set_value(&self, value: &str);

    /// Language mode of the editor
    fn language(&self) -> String;
}

/// In-memory editor buffer
#[derive(Debug)]
pub struct TextBuffer {
    text: RwLock<String>,
    language: String,
}

impl TextBuffer {
    /// A buffer holding `text` in the given language mode
    pub fn new(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            text: RwLock::new(text.into()),
            language: language.into(),
        }
    }

    /// A buffer seeded with the configured initial value and language
    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.initial_value.clone(), config.language.clone())
    }
}

impl Editor for TextBuffer {
    fn value(&self) -> String {
        match self.text.read() {
            Ok(text) => text.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set_value(&self, value: &str) {
        let mut text = match self.text.write() {
            Ok(text) => text,
            Err(poisoned) => poisoned.into_inner(),
        };
        *text = value.to_string();
    }

    fn language(&self) -> String {
        self.language.clone()
    }
}

/// Holds the editor once it has been initialized
///
/// `wait_ready` resolves as soon as `install` is called, or fails after the
/// given maximum wait.
pub struct EditorSlot {
    editor: watch::Sender<Option<Arc<dyn Editor>>>,
}

impl Default for EditorSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSlot {
    /// An empty slot
    pub fn new() -> Self {
        let (editor, _) = watch::channel(None);
        Self { editor }
    }

    /// A slot that is ready immediately
    pub fn ready(editor: Arc<dyn Editor>) -> Self {
        let slot = Self::new();
        slot.install(editor);
        slot
    }

    /// Install the editor. Only the first installation takes effect.
    pub fn install(&self, editor: Arc<dyn Editor>) -> bool {
        let installed = self.editor.send_if_modified(move |slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(editor);
            true
        });

        if installed {
            tracing::debug!("editor ready");
        }
        installed
    }

    /// The editor, if already installed
    pub fn get(&self) -> Option<Arc<dyn Editor>> {
        self.editor.borrow().clone()
    }

    /// Whether an editor has been installed
    pub fn is_ready(&self) -> bool {
        self.editor.borrow().is_some()
    }

    /// Wait until an editor is installed, for at most `max_wait`
    pub async fn wait_ready(&self, max_wait: Duration) -> Result<Arc<dyn Editor>> {
        let mut rx = self.editor.subscribe();
        let waited = tokio::time::timeout(max_wait, rx.wait_for(Option::is_some)).await;

        let editor = match waited {
            Ok(Ok(slot)) => (*slot).clone(),
            _ => None,
        };

        editor.ok_or(Error::EditorNotReady { waited: max_wait })
    }
}
