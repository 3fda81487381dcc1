//! Text rendering for a [`TableView`].
//!
//! This is the collaborator side of the table contract: the view model is
//! computed elsewhere, this module just draws it for a terminal.

use owo_colors::OwoColorize;
use tabled::builder::Builder;
use tabled::settings::Style;

use super::{CellValue, TableView};

const SKELETON_CELL: &str = "░░░░░░";

/// Render a table view as terminal text
pub fn render_table(view: &TableView) -> String {
    let mut builder = Builder::default();
    builder.push_record(view.headers.clone());

    if view.empty {
        let mut row = vec!["No results.".to_string()];
        row.resize(view.headers.len(), String::new());
        builder.push_record(row);
    } else {
        for row in &view.rows {
            builder.push_record(row.iter().map(|cell| match cell {
                CellValue::Text(text) => text.clone(),
                CellValue::Skeleton => SKELETON_CELL.to_string(),
            }));
        }
    }

    let table = builder.build().with(Style::rounded()).to_string();

    let mut out = String::new();
    if view.loading {
        out.push_str(&format!("{}\n", "Loading…".dimmed()));
    }
    if view.stale {
        out.push_str(&format!(
            "{}\n",
            "Showing previous results; the last refresh failed.".yellow()
        ));
    }
    out.push_str(&table);
    out.push('\n');
    out.push_str(&render_pager(view));
    out
}

fn render_pager(view: &TableView) -> String {
    let control = |label: &str, enabled: bool| {
        if enabled {
            label.to_string()
        } else {
            format!("{}", label.dimmed())
        }
    };

    format!(
        "{} {} page {}/{} {} {}",
        control("|<", view.pager.first_enabled),
        control("<", view.pager.prev_enabled),
        view.pager.page_index + 1,
        view.pager.total_pages.max(1),
        control(">", view.pager.next_enabled),
        control(">|", view.pager.last_enabled),
    )
}
