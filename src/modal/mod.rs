//! Modal orchestration: which dialog is open, and with what data.
//!
//! One store per role scope, constructed at application start and passed
//! down explicitly; there is no hidden global. Dialog variants are closed
//! enums carrying typed props, so a typo'd dialog tag or a malformed props
//! bag is a compile error rather than a blank modal.

pub mod confirm;
pub mod router;

use parking_lot::RwLock;

use crate::role::Role;

pub use confirm::{CONFIRM_PHRASE, ConfirmGate, GateAction};
pub use router::{DialogRouter, DialogView};

/// A dialog variant that can be routed by tag
pub trait Dialog: Clone + Send + Sync + 'static {
    /// Stable tag used by the router's registry
    fn tag(&self) -> &'static str;
}

/// Props for create dialogs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProps {
    pub resource: String,
}

/// Props for edit dialogs
#[derive(Debug, Clone, PartialEq)]
pub struct EditProps {
    pub resource: String,
    pub id: String,
    /// Current field values, opaque to the core
    pub fields: serde_json::Value,
}

/// Props for read-only detail dialogs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewProps {
    pub resource: String,
    pub id: String,
}

/// Props for confirm-delete dialogs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteProps {
    pub resource: String,
    pub id: String,
    /// Human-readable label for "You are about to delete…"
    pub label: String,
}

/// Dialogs available on admin screens
#[derive(Debug, Clone, PartialEq)]
pub enum AdminDialog {
    Create(CreateProps),
    Edit(EditProps),
    View(ViewProps),
    ConfirmDelete(DeleteProps),
}

impl Dialog for AdminDialog {
    fn tag(&self) -> &'static str {
        match self {
            AdminDialog::Create(_) => "create",
            AdminDialog::Edit(_) => "edit",
            AdminDialog::View(_) => "view",
            AdminDialog::ConfirmDelete(_) => "confirm-delete",
        }
    }
}

/// Dialogs available on teacher screens
#[derive(Debug, Clone, PartialEq)]
pub enum TeacherDialog {
    Create(CreateProps),
    Edit(EditProps),
    ConfirmDelete(DeleteProps),
}

impl Dialog for TeacherDialog {
    fn tag(&self) -> &'static str {
        match self {
            TeacherDialog::Create(_) => "create",
            TeacherDialog::Edit(_) => "edit",
            TeacherDialog::ConfirmDelete(_) => "confirm-delete",
        }
    }
}

/// Dialogs available on student screens
#[derive(Debug, Clone, PartialEq)]
pub enum StudentDialog {
    View(ViewProps),
    CancelSubscription(DeleteProps),
}

impl Dialog for StudentDialog {
    fn tag(&self) -> &'static str {
        match self {
            StudentDialog::View(_) => "view",
            StudentDialog::CancelSubscription(_) => "cancel-subscription",
        }
    }
}

/// Single source of truth for which dialog is open in one role scope.
///
/// `open` replaces the previous dialog wholesale; `close` drops the props
/// entirely, so nothing leaks into the next open.
pub struct ModalStore<D: Dialog> {
    open: RwLock<Option<D>>,
}

impl<D: Dialog> Default for ModalStore<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Dialog> ModalStore<D> {
    pub fn new() -> Self {
        Self {
            open: RwLock::new(None),
        }
    }

    /// Open a dialog, replacing whatever was open before
    pub fn open(&self, dialog: D) {
        *self.open.write() = Some(dialog);
    }

    /// Close the current dialog and drop its props
    pub fn close(&self) {
        *self.open.write() = None;
    }

    pub fn is_open(&self) -> bool {
        self.open.read().is_some()
    }

    /// The open dialog, if any. When closed, there is no leftover state
    /// to misread.
    pub fn current(&self) -> Option<D> {
        self.open.read().clone()
    }
}

/// The per-role modal stores, created once at application start
#[derive(Default)]
pub struct ModalStores {
    pub admin: ModalStore<AdminDialog>,
    pub teacher: ModalStore<TeacherDialog>,
    pub student: ModalStore<StudentDialog>,
}

impl ModalStores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close every scope's dialog, e.g. at logout
    pub fn close_all(&self) {
        self.admin.close();
        self.teacher.close();
        self.student.close();
    }

    /// Whether the given role scope currently shows a dialog
    pub fn is_open(&self, role: Role) -> bool {
        match role {
            Role::Admin => self.admin.is_open(),
            Role::Teacher => self.teacher.is_open(),
            Role::Student => self.student.is_open(),
        }
    }
}
