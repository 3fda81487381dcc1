//! Debounced search input.
//!
//! The raw text updates on every keystroke so the input box stays
//! responsive; the debounced value, which is what participates in a
//! [`QueryKey`](super::key::QueryKey), only settles after the input has
//! been quiet for the full window. One fetch per pause, not per keystroke.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Quiet window before a search term takes effect
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(800);

/// Buffers free-text input before it reaches the query layer
pub struct Debouncer {
    raw: String,
    window: Duration,
    tx: watch::Sender<String>,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::with_window(DEBOUNCE_WINDOW)
    }

    pub fn with_window(window: Duration) -> Self {
        let (tx, _rx) = watch::channel(String::new());
        Self {
            raw: String::new(),
            window,
            tx,
            pending: None,
        }
    }

    /// Subscribe to debounced updates
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.tx.subscribe()
    }

    /// The text exactly as typed
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The last value that survived a full quiet window
    pub fn debounced(&self) -> String {
        self.tx.borrow().clone()
    }

    /// Record a keystroke: update the raw text immediately and restart the
    /// quiet-window timer, canceling any previously scheduled publish.
    pub fn on_change(&mut self, text: impl Into<String>) {
        self.raw = text.into();

        if let Some(pending) = self.pending.take() {
            pending.abort();
        }

        let tx = self.tx.clone();
        let value = self.raw.clone();
        let window = self.window;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            // Receivers may all be gone; nothing to do then.
            let _ = tx.send(value);
        }));
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Debouncer {
    // A timer must never outlive its consumer: dropping the debouncer
    // cancels the scheduled publish.
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}
