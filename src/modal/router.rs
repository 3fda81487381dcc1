//! Dialog routing: one registry per role scope mapping dialog tags to
//! renderers. An unregistered tag renders nothing — a missing dialog must
//! never take down an otherwise-working list screen.

use std::collections::HashMap;

use super::{Dialog, ModalStore};

/// Declarative description of a dialog, for the surrounding UI to draw
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DialogView {
    pub title: String,
    pub body: Vec<String>,
    /// Label for the primary action, when the dialog has one
    pub confirm_label: Option<String>,
    /// Whether the primary action is destructive (confirm-gated)
    pub destructive: bool,
}

type RendererFn<D> = Box<dyn Fn(&D) -> DialogView + Send + Sync>;

/// Registry of dialog renderers for one role scope
pub struct DialogRouter<D: Dialog> {
    renderers: HashMap<&'static str, RendererFn<D>>,
}

impl<D: Dialog> Default for DialogRouter<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Dialog> DialogRouter<D> {
    pub fn new() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    /// Register the renderer for a dialog tag
    pub fn register(
        mut self,
        tag: &'static str,
        renderer: impl Fn(&D) -> DialogView + Send + Sync + 'static,
    ) -> Self {
        self.renderers.insert(tag, Box::new(renderer));
        self
    }

    /// Render whatever dialog the store currently holds.
    ///
    /// Returns `None` when the store is closed, and also — fail closed —
    /// when the open dialog's tag has no registered renderer.
    pub fn render(&self, store: &ModalStore<D>) -> Option<DialogView> {
        let dialog = store.current()?;
        match self.renderers.get(dialog.tag()) {
            Some(renderer) => Some(renderer(&dialog)),
            None => {
                tracing::warn!(tag = dialog.tag(), "no renderer registered for dialog");
                None
            }
        }
    }
}
