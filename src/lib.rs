pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod modal;
pub mod mutation;
pub mod query;
pub mod role;
pub mod table;
pub mod toast;

pub use api::{ApiBackend, HttpBackend, ListEnvelope, MutationEnvelope};
pub use config::{Config, RetryProfile};
pub use error::{ConsoleError, Result};
pub use modal::{
    AdminDialog, CONFIRM_PHRASE, ConfirmGate, CreateProps, DeleteProps, Dialog, DialogRouter,
    DialogView, EditProps, GateAction, ModalStore, ModalStores, StudentDialog, TeacherDialog,
    ViewProps,
};
pub use mutation::{MutationKind, MutationOutcome, Mutator};
pub use query::{
    CacheEntry, DEBOUNCE_WINDOW, Debouncer, FetchError, FetchOutcome, FetchStatus, ListFetcher,
    ListParams, ListSnapshot, MemoryNavigator, Navigator, PAGE_SIZE, Page, QueryCache, QueryKey,
    handle_pagination,
};
pub use role::Role;
pub use table::{CellValue, Column, PagerView, Pagination, TableView, compute_table_view};
pub use toast::{Toast, ToastLevel};
