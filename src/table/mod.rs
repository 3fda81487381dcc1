//! Generic remote-data table.
//!
//! A list screen hands over its column descriptors and the current cache
//! snapshot; `compute_table_view` is a pure function from that input to a
//! declarative view (rows, skeletons, pager flags). Actual drawing lives
//! behind [`render`]; everything here is testable without a terminal.

pub mod render;

use crate::query::{FetchStatus, PAGE_SIZE};

/// A single rendered cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Text(String),
    /// Placeholder of the same shape while a fetch is in flight
    Skeleton,
}

type CellFn<T> = Box<dyn Fn(&T, usize) -> String + Send + Sync>;

/// Describes one column of a list screen
pub struct Column<T> {
    pub id: String,
    pub header: String,
    cell: CellFn<T>,
}

impl<T> Column<T> {
    pub fn new(
        id: impl Into<String>,
        header: impl Into<String>,
        cell: impl Fn(&T, usize) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            cell: Box::new(cell),
        }
    }

    pub fn cell(&self, record: &T, row_index: usize) -> String {
        (self.cell)(record, row_index)
    }
}

/// Row serial for the synthetic first column. Recomputed from page offset
/// and row position on every render, never stored on the record.
pub fn serial_number(page_index: usize, page_size: usize, row_index: usize) -> usize {
    page_index * page_size + row_index + 1
}

/// Pagination inputs for one table render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 0-based mirror of the location's 1-based page
    pub page_index: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl Pagination {
    pub fn new(page_index: usize, total_pages: usize) -> Self {
        Self {
            page_index,
            page_size: PAGE_SIZE,
            total_pages,
        }
    }
}

/// Enablement of the first/prev/next/last controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerView {
    pub page_index: usize,
    pub total_pages: usize,
    pub first_enabled: bool,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub last_enabled: bool,
}

impl PagerView {
    fn compute(pagination: &Pagination) -> Self {
        let at_start = pagination.page_index == 0;
        let at_end = pagination.total_pages == 0
            || pagination.page_index + 1 >= pagination.total_pages;
        Self {
            page_index: pagination.page_index,
            total_pages: pagination.total_pages,
            first_enabled: !at_start,
            prev_enabled: !at_start,
            next_enabled: !at_end,
            last_enabled: !at_end,
        }
    }
}

/// Declarative description of a rendered table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    /// "#" plus each column header
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    /// No rows and nothing in flight: show the single "no results" row
    pub empty: bool,
    /// A fetch is in flight; rows are skeletons, overlay is non-blocking
    pub loading: bool,
    /// Rows survive from before the most recent failure
    pub stale: bool,
    pub pager: PagerView,
}

/// Pure function: columns + snapshot -> view.
///
/// While fetching, the existing rows keep their count and shape as
/// skeletons so the layout does not shift; a first load with nothing
/// cached skeletons a full page instead.
pub fn compute_table_view<T>(
    columns: &[Column<T>],
    data: &[T],
    status: FetchStatus,
    stale: bool,
    pagination: &Pagination,
) -> TableView {
    let mut headers = Vec::with_capacity(columns.len() + 1);
    headers.push("#".to_string());
    headers.extend(columns.iter().map(|c| c.header.clone()));

    let width = columns.len() + 1;
    let fetching = status == FetchStatus::Fetching;

    let rows: Vec<Vec<CellValue>> = if fetching {
        let count = if data.is_empty() {
            pagination.page_size
        } else {
            data.len()
        };
        (0..count).map(|_| vec![CellValue::Skeleton; width]).collect()
    } else {
        data.iter()
            .enumerate()
            .map(|(row_index, record)| {
                let mut row = Vec::with_capacity(width);
                row.push(CellValue::Text(
                    serial_number(pagination.page_index, pagination.page_size, row_index)
                        .to_string(),
                ));
                row.extend(
                    columns
                        .iter()
                        .map(|column| CellValue::Text(column.cell(record, row_index))),
                );
                row
            })
            .collect()
    };

    TableView {
        empty: rows.is_empty() && !fetching,
        loading: fetching,
        stale,
        pager: PagerView::compute(pagination),
        headers,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<Column<(&'static str, &'static str)>> {
        vec![
            Column::new("title", "Title", |r: &(&str, &str), _| r.0.to_string()),
            Column::new("status", "Status", |r: &(&str, &str), _| r.1.to_string()),
        ]
    }

    #[test]
    fn test_serial_number_is_pure_arithmetic() {
        assert_eq!(serial_number(2, 10, 3), 24);
        assert_eq!(serial_number(0, 10, 0), 1);
        assert_eq!(serial_number(4, 10, 9), 50);
    }

    #[test]
    fn test_rows_carry_serials_from_page_offset() {
        let data = vec![("Algebra I", "live"), ("Algebra II", "draft")];
        let view = compute_table_view(
            &columns(),
            &data,
            FetchStatus::Success,
            false,
            &Pagination::new(2, 5),
        );

        assert_eq!(view.rows[0][0], CellValue::Text("21".into()));
        assert_eq!(view.rows[1][0], CellValue::Text("22".into()));
        assert_eq!(view.rows[1][1], CellValue::Text("Algebra II".into()));
    }

    #[test]
    fn test_fetching_replaces_cells_but_keeps_row_count() {
        let data = vec![("a", "x"), ("b", "y"), ("c", "z")];
        let view = compute_table_view(
            &columns(),
            &data,
            FetchStatus::Fetching,
            false,
            &Pagination::new(0, 1),
        );

        assert!(view.loading);
        assert!(!view.empty);
        assert_eq!(view.rows.len(), 3, "rows are not removed while loading");
        assert!(
            view.rows
                .iter()
                .all(|row| row.iter().all(|cell| *cell == CellValue::Skeleton))
        );
    }

    #[test]
    fn test_first_load_skeletons_a_full_page() {
        let view = compute_table_view(
            &columns(),
            &[],
            FetchStatus::Fetching,
            false,
            &Pagination::new(0, 0),
        );
        assert_eq!(view.rows.len(), PAGE_SIZE);
        assert!(!view.empty);
    }

    #[test]
    fn test_no_data_and_idle_network_is_the_empty_state() {
        let view = compute_table_view(
            &columns(),
            &[],
            FetchStatus::Success,
            false,
            &Pagination::new(0, 0),
        );
        assert!(view.empty);
        assert!(view.rows.is_empty());
    }

    #[test]
    fn test_pager_disabled_at_first_page() {
        let view = compute_table_view(
            &columns(),
            &[("a", "x")],
            FetchStatus::Success,
            false,
            &Pagination::new(0, 5),
        );
        assert!(!view.pager.first_enabled);
        assert!(!view.pager.prev_enabled);
        assert!(view.pager.next_enabled);
        assert!(view.pager.last_enabled);
    }

    #[test]
    fn test_pager_disabled_at_last_page() {
        let view = compute_table_view(
            &columns(),
            &[("a", "x")],
            FetchStatus::Success,
            false,
            &Pagination::new(4, 5),
        );
        assert!(view.pager.first_enabled);
        assert!(view.pager.prev_enabled);
        assert!(!view.pager.next_enabled);
        assert!(!view.pager.last_enabled);
    }

    #[test]
    fn test_pager_all_disabled_with_no_pages() {
        let view = compute_table_view(
            &columns(),
            &[],
            FetchStatus::Success,
            false,
            &Pagination::new(0, 0),
        );
        assert!(!view.pager.first_enabled);
        assert!(!view.pager.prev_enabled);
        assert!(!view.pager.next_enabled);
        assert!(!view.pager.last_enabled);
    }

    #[test]
    fn test_stale_flag_passes_through() {
        let view = compute_table_view(
            &columns(),
            &[("a", "x")],
            FetchStatus::Error,
            true,
            &Pagination::new(0, 1),
        );
        assert!(view.stale);
        assert_eq!(view.rows.len(), 1, "stale rows still render");
    }
}
