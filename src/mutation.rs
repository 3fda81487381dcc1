//! Write operations and cache invalidation.
//!
//! A successful mutation invalidates every cache key of the affected
//! resource (mounted tables refetch on their next read, not eagerly),
//! closes the originating dialog, and reports a success toast. A failed
//! mutation leaves the dialog open with its state intact so no user
//! input is lost.

use std::sync::Arc;

use serde_json::Value;

use crate::api::ApiBackend;
use crate::error::ConsoleError;
use crate::modal::{Dialog, ModalStore};
use crate::query::{ListParams, Navigator, QueryCache};
use crate::toast::Toast;

/// A write operation against the platform API
#[derive(Debug, Clone)]
pub enum MutationKind {
    Create {
        resource: String,
        body: Value,
    },
    Edit {
        resource: String,
        id: String,
        body: Value,
    },
    Delete {
        resource: String,
        id: String,
    },
}

impl MutationKind {
    /// The list resource whose cache keys this mutation invalidates
    pub fn resource(&self) -> &str {
        match self {
            MutationKind::Create { resource, .. }
            | MutationKind::Edit { resource, .. }
            | MutationKind::Delete { resource, .. } => resource,
        }
    }

    fn default_success_message(&self) -> &'static str {
        match self {
            MutationKind::Create { .. } => "Created successfully.",
            MutationKind::Edit { .. } => "Changes saved.",
            MutationKind::Delete { .. } => "Deleted successfully.",
        }
    }

    fn default_failure_message(&self) -> &'static str {
        match self {
            MutationKind::Create { .. } => "Could not create the record.",
            MutationKind::Edit { .. } => "Could not save the changes.",
            MutationKind::Delete { .. } => "Could not delete the record.",
        }
    }
}

/// Result of running a mutation
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    pub success: bool,
    /// Server-provided message, when there was one
    pub message: Option<String>,
    /// Notification for the surrounding UI to flash
    pub toast: Toast,
}

/// Runs mutations and wires up invalidation and modal closing
pub struct Mutator {
    backend: Arc<dyn ApiBackend>,
    cache: Arc<QueryCache<Value>>,
}

impl Mutator {
    pub fn new(backend: Arc<dyn ApiBackend>, cache: Arc<QueryCache<Value>>) -> Self {
        Self { backend, cache }
    }

    /// Run a mutation originating from the given dialog.
    ///
    /// The store is closed only on success; on failure the dialog (and any
    /// confirm-gate state the caller holds) stays as it was.
    pub async fn run<D: Dialog>(
        &self,
        modal: &ModalStore<D>,
        kind: MutationKind,
    ) -> MutationOutcome {
        let result = match &kind {
            MutationKind::Create { resource, body } => {
                self.backend.create(resource, body.clone()).await
            }
            MutationKind::Edit { resource, id, body } => {
                self.backend.update(resource, id, body.clone()).await
            }
            MutationKind::Delete { resource, id } => self.backend.delete(resource, id).await,
        };

        match result {
            Ok(envelope) if envelope.success => {
                let invalidated = self.cache.invalidate_resource(kind.resource());
                tracing::debug!(
                    resource = kind.resource(),
                    invalidated,
                    "mutation succeeded"
                );
                modal.close();
                let message = envelope.message.clone();
                MutationOutcome {
                    success: true,
                    toast: Toast::success(
                        message
                            .clone()
                            .unwrap_or_else(|| kind.default_success_message().to_string()),
                    ),
                    message,
                }
            }
            Ok(envelope) => self.failure(&kind, envelope.message),
            Err(ConsoleError::Auth(message)) => {
                self.failure(&kind, Some(format!("Not authorized: {message}")))
            }
            Err(err) => {
                tracing::warn!(resource = kind.resource(), error = %err, "mutation failed");
                self.failure(&kind, None)
            }
        }
    }

    /// Run a mutation and, on success, navigate to the given list location
    pub async fn run_and_navigate<D: Dialog>(
        &self,
        modal: &ModalStore<D>,
        kind: MutationKind,
        nav: &mut dyn Navigator,
        path: &str,
        params: &ListParams,
    ) -> MutationOutcome {
        let outcome = self.run(modal, kind).await;
        if outcome.success {
            nav.navigate(path, params);
        }
        outcome
    }

    fn failure(&self, kind: &MutationKind, message: Option<String>) -> MutationOutcome {
        MutationOutcome {
            success: false,
            toast: Toast::error(
                message
                    .clone()
                    .unwrap_or_else(|| kind.default_failure_message().to_string()),
            ),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use crate::api::{ListEnvelope, MutationEnvelope};
    use crate::error::Result;
    use crate::modal::{AdminDialog, DeleteProps};
    use crate::query::{FetchOutcome, FetchStatus, Page, QueryKey};
    use crate::toast::ToastLevel;

    use super::*;

    /// Backend with a scripted verdict for every mutation
    struct ScriptedBackend {
        success: bool,
        message: Option<String>,
        deletes: AtomicU32,
    }

    impl ScriptedBackend {
        fn new(success: bool, message: Option<&str>) -> Self {
            Self {
                success,
                message: message.map(String::from),
                deletes: AtomicU32::new(0),
            }
        }

        fn envelope(&self) -> MutationEnvelope {
            MutationEnvelope {
                success: self.success,
                message: self.message.clone(),
            }
        }
    }

    #[async_trait]
    impl ApiBackend for ScriptedBackend {
        async fn fetch_page(
            &self,
            _: &str,
            _: u32,
            _: Option<&str>,
            _: &BTreeMap<String, String>,
        ) -> Result<ListEnvelope> {
            unimplemented!("mutation-only backend")
        }

        async fn create(&self, _: &str, _: Value) -> Result<MutationEnvelope> {
            Ok(self.envelope())
        }
        async fn update(&self, _: &str, _: &str, _: Value) -> Result<MutationEnvelope> {
            Ok(self.envelope())
        }
        async fn delete(&self, _: &str, _: &str) -> Result<MutationEnvelope> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            Ok(self.envelope())
        }
    }

    fn open_delete_dialog() -> ModalStore<AdminDialog> {
        let store = ModalStore::new();
        store.open(AdminDialog::ConfirmDelete(DeleteProps {
            resource: "courses".into(),
            id: "42".into(),
            label: "Algebra I".into(),
        }));
        store
    }

    async fn seeded_cache() -> Arc<QueryCache<Value>> {
        let cache = Arc::new(QueryCache::new());
        cache
            .fetch_with(&QueryKey::new("courses"), || async {
                FetchOutcome::Page(Page::new(vec![json!({"id": 42})], 1))
            })
            .await;
        cache
    }

    #[tokio::test]
    async fn test_success_closes_modal_and_invalidates() {
        let cache = seeded_cache().await;
        let backend = Arc::new(ScriptedBackend::new(true, None));
        let store = open_delete_dialog();

        let outcome = Mutator::new(backend.clone(), cache.clone())
            .run(
                &store,
                MutationKind::Delete {
                    resource: "courses".into(),
                    id: "42".into(),
                },
            )
            .await;

        assert!(outcome.success);
        assert_eq!(backend.deletes.load(Ordering::SeqCst), 1);
        assert_eq!(outcome.toast.level, ToastLevel::Success);
        assert!(!store.is_open(), "modal closes on success");
        assert_eq!(
            cache.get(&QueryKey::new("courses")).status,
            FetchStatus::Idle,
            "owning cache keys are invalidated"
        );
    }

    #[tokio::test]
    async fn test_failure_keeps_modal_open_and_surfaces_message() {
        let cache = seeded_cache().await;
        let backend = Arc::new(ScriptedBackend::new(false, Some("Course has enrollments")));
        let store = open_delete_dialog();

        let outcome = Mutator::new(backend, cache.clone())
            .run(
                &store,
                MutationKind::Delete {
                    resource: "courses".into(),
                    id: "42".into(),
                },
            )
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.toast.level, ToastLevel::Error);
        assert_eq!(outcome.toast.message, "Course has enrollments");
        assert!(store.is_open(), "modal stays open for a retry");
        assert_eq!(
            cache.get(&QueryKey::new("courses")).status,
            FetchStatus::Success,
            "nothing is invalidated on failure"
        );
    }

    #[tokio::test]
    async fn test_failure_without_message_uses_generic_text() {
        let cache = Arc::new(QueryCache::new());
        let backend = Arc::new(ScriptedBackend::new(false, None));
        let store = open_delete_dialog();

        let outcome = Mutator::new(backend, cache)
            .run(
                &store,
                MutationKind::Delete {
                    resource: "courses".into(),
                    id: "42".into(),
                },
            )
            .await;

        assert_eq!(outcome.toast.message, "Could not delete the record.");
    }

    #[tokio::test]
    async fn test_run_and_navigate_only_navigates_on_success() {
        use crate::query::MemoryNavigator;

        let cache = Arc::new(QueryCache::new());
        let store = open_delete_dialog();
        let mut nav = MemoryNavigator::new("/admin/courses/new");

        let failing = Mutator::new(Arc::new(ScriptedBackend::new(false, None)), cache.clone());
        failing
            .run_and_navigate(
                &store,
                MutationKind::Create {
                    resource: "courses".into(),
                    body: json!({"title": "Algebra I"}),
                },
                &mut nav,
                "/admin/courses",
                &ListParams::default(),
            )
            .await;
        assert_eq!(nav.current().path(), "/admin/courses/new");

        let succeeding = Mutator::new(Arc::new(ScriptedBackend::new(true, None)), cache);
        succeeding
            .run_and_navigate(
                &store,
                MutationKind::Create {
                    resource: "courses".into(),
                    body: json!({"title": "Algebra I"}),
                },
                &mut nav,
                "/admin/courses",
                &ListParams::default(),
            )
            .await;
        assert_eq!(nav.current().path(), "/admin/courses");
    }
}
