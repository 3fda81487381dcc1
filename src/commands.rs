//! Command implementations for the `campus` binary.
//!
//! Each command wires the data layer together the same way a list screen
//! would: location first, then key, then cache, then view model.

use std::io::{BufRead, Write as _};
use std::process::ExitCode;
use std::sync::Arc;

use owo_colors::OwoColorize;
use serde_json::Value;

use crate::api::HttpBackend;
use crate::config::Config;
use crate::error::{ConsoleError, Result};
use crate::modal::{
    AdminDialog, ConfirmGate, CreateProps, DeleteProps, DialogRouter, DialogView, EditProps,
    GateAction, ModalStore,
};
use crate::mutation::{MutationKind, Mutator};
use crate::query::{ListFetcher, ListParams, MemoryNavigator, Navigator, QueryCache};
use crate::role::Role;
use crate::table::render::render_table;
use crate::table::{Column, Pagination, compute_table_view};
use crate::toast::Toast;

struct Session {
    backend: Arc<HttpBackend>,
    cache: Arc<QueryCache<Value>>,
    config: Config,
    role: Role,
}

fn session(role: Option<String>) -> Result<Session> {
    let config = Config::load()?;
    let role = match role {
        Some(r) => r.parse()?,
        None => config.default_role,
    };
    let backend = Arc::new(HttpBackend::from_config(&config)?);
    Ok(Session {
        backend,
        cache: Arc::new(QueryCache::new()),
        config,
        role,
    })
}

fn print_toast(toast: &Toast) {
    println!("{}", toast.message.color(toast.color()));
}

/// Derive columns from the keys of the first record, capped so wide
/// resources do not wrap the terminal
fn derive_columns(items: &[Value]) -> Vec<Column<Value>> {
    const MAX_COLUMNS: usize = 6;

    let Some(Value::Object(first)) = items.first() else {
        return vec![Column::new("record", "Record", |record: &Value, _| {
            record.to_string()
        })];
    };

    first
        .keys()
        .take(MAX_COLUMNS)
        .map(|key| {
            let field = key.clone();
            let header = field.clone();
            Column::new(field.clone(), header, move |record: &Value, _| {
                match record.get(&field) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Null) | None => String::new(),
                    Some(other) => other.to_string(),
                }
            })
        })
        .collect()
}

/// List one page of a resource
pub async fn cmd_list(
    resource: &str,
    page: u32,
    search: Option<String>,
    role: Option<String>,
) -> Result<()> {
    let session = session(role)?;
    let fetcher = ListFetcher::new(
        session.backend.clone(),
        session.cache.clone(),
        session.config.retry,
    );

    // The location carries the list state; everything downstream rereads it
    // from there rather than from local copies.
    let path = format!("/{}/{}", session.role, resource);
    let mut nav = MemoryNavigator::new(&path);
    let params = ListParams::default()
        .with_search(search.unwrap_or_default())
        .with_page(page);
    nav.navigate(&path, &params);

    let params = nav.params();
    let key = ListFetcher::key_for(resource, &params);
    let snapshot = match fetcher.load(&key).await {
        Err(ConsoleError::Auth(message)) => {
            return Err(ConsoleError::Auth(format!(
                "{message}. Set a token with `campus config set token <token>` \
                 or the CAMPUS_TOKEN environment variable."
            )));
        }
        other => other?,
    };

    let columns = derive_columns(&snapshot.page.items);
    let view = compute_table_view(
        &columns,
        &snapshot.page.items,
        snapshot.status,
        snapshot.stale,
        &Pagination::new(params.page_index(), snapshot.page.total_pages as usize),
    );
    println!("{}", render_table(&view));
    Ok(())
}

/// Create a record from a JSON body
pub async fn cmd_add(resource: &str, data: &str, role: Option<String>) -> Result<ExitCode> {
    let session = session(role)?;
    let body: Value = serde_json::from_str(data)
        .map_err(|e| ConsoleError::Other(format!("--data is not valid JSON: {e}")))?;

    let modal: ModalStore<AdminDialog> = ModalStore::new();
    modal.open(AdminDialog::Create(CreateProps {
        resource: resource.to_string(),
    }));

    let outcome = Mutator::new(session.backend, session.cache)
        .run(
            &modal,
            MutationKind::Create {
                resource: resource.to_string(),
                body,
            },
        )
        .await;
    print_toast(&outcome.toast);
    Ok(exit_status(outcome.success))
}

/// Update a record from a JSON body
pub async fn cmd_edit(
    resource: &str,
    id: &str,
    data: &str,
    role: Option<String>,
) -> Result<ExitCode> {
    let session = session(role)?;
    let body: Value = serde_json::from_str(data)
        .map_err(|e| ConsoleError::Other(format!("--data is not valid JSON: {e}")))?;

    let modal: ModalStore<AdminDialog> = ModalStore::new();
    modal.open(AdminDialog::Edit(EditProps {
        resource: resource.to_string(),
        id: id.to_string(),
        fields: body.clone(),
    }));

    let outcome = Mutator::new(session.backend, session.cache)
        .run(
            &modal,
            MutationKind::Edit {
                resource: resource.to_string(),
                id: id.to_string(),
                body,
            },
        )
        .await;
    print_toast(&outcome.toast);
    Ok(exit_status(outcome.success))
}

/// Delete a record, guarded by the type-to-confirm gate
pub async fn cmd_delete(resource: &str, id: &str, role: Option<String>) -> Result<ExitCode> {
    let session = session(role)?;

    let modal: ModalStore<AdminDialog> = ModalStore::new();
    modal.open(AdminDialog::ConfirmDelete(DeleteProps {
        resource: resource.to_string(),
        id: id.to_string(),
        label: format!("{resource} {id}"),
    }));

    let router = DialogRouter::new().register("confirm-delete", |dialog: &AdminDialog| {
        match dialog {
            AdminDialog::ConfirmDelete(props) => DialogView {
                title: format!("Delete {}?", props.label),
                body: vec![format!(
                    "This permanently removes {} from {}.",
                    props.label, props.resource
                )],
                confirm_label: Some("Delete".into()),
                destructive: true,
            },
            _ => DialogView::default(),
        }
    });

    if let Some(view) = router.render(&modal) {
        println!("{}", view.title.bold());
        for line in &view.body {
            println!("{line}");
        }
    }

    let mut gate = ConfirmGate::new();
    // First click arms the gate and reveals the confirmation prompt.
    gate.click();
    print!("Type \"delete\" to confirm: ");
    std::io::stdout().flush()?;

    let mut typed = String::new();
    std::io::stdin().lock().read_line(&mut typed)?;
    gate.set_typed(typed.trim_end_matches(['\n', '\r']));

    match gate.click() {
        GateAction::Confirmed => {
            let outcome = Mutator::new(session.backend, session.cache)
                .run(
                    &modal,
                    MutationKind::Delete {
                        resource: resource.to_string(),
                        id: id.to_string(),
                    },
                )
                .await;
            print_toast(&outcome.toast);
            Ok(exit_status(outcome.success))
        }
        _ => {
            modal.close();
            println!("{}", "Phrase did not match; nothing was deleted.".yellow());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Show the current configuration
pub fn cmd_config_show() -> Result<()> {
    let config = Config::load()?;
    println!("api_url: {}", config.api_url);
    println!("retry: {}", config.retry);
    println!("request_timeout: {}s", config.request_timeout);
    println!("default_role: {}", config.default_role);
    println!(
        "token: {}",
        if config.api_token().is_some() {
            "[set]"
        } else {
            "[unset]"
        }
    );
    Ok(())
}

/// Set one configuration key
pub fn cmd_config_set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;
    match key {
        "api_url" => config.api_url = value.to_string(),
        "token" => config.set_api_token(value.to_string()),
        "retry" => {
            config.retry = serde_yaml_ng::from_str(value)
                .map_err(|_| ConsoleError::Config(format!("unknown retry profile '{value}'")))?;
        }
        "request_timeout" => {
            config.request_timeout = value
                .parse()
                .map_err(|_| ConsoleError::Config(format!("invalid timeout '{value}'")))?;
        }
        "default_role" => config.default_role = value.parse()?,
        other => {
            return Err(ConsoleError::Config(format!("unknown config key '{other}'")));
        }
    }
    config.save()?;
    println!("Set {key}.");
    Ok(())
}

fn exit_status(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_derive_columns_from_first_record() {
        let items = vec![json!({"id": 1, "title": "Algebra", "status": "live"})];
        let columns = derive_columns(&items);
        let ids: Vec<&str> = columns.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["id", "status", "title"]);
        assert_eq!(columns[2].cell(&items[0], 0), "Algebra");
    }

    #[test]
    fn test_derive_columns_caps_width() {
        let items = vec![json!({
            "a": 1, "b": 2, "c": 3, "d": 4, "e": 5, "f": 6, "g": 7, "h": 8
        })];
        assert_eq!(derive_columns(&items).len(), 6);
    }

    #[test]
    fn test_derive_columns_for_non_object_records() {
        let items = vec![json!("plain string")];
        let columns = derive_columns(&items);
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].cell(&items[0], 0), "\"plain string\"");
    }
}
