//! Raw-row table view.
//!
//! Renders one [`Page`] of trip records as an aligned plain-text table. Cell
//! widths are measured in terminal columns so station names with wide
//! characters stay aligned.

use bikeshare_core::formatting;
use bikeshare_core::models::{columns, OptionalField, TripRecord};
use bikeshare_data::filter::FilteredView;
use bikeshare_data::pager::Page;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Longest cell, in terminal columns, before truncation.
const MAX_CELL_WIDTH: usize = 32;

/// Column separator.
const GAP: &str = "  ";

/// Display strings for a single table row.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRowData {
    /// 1-based position within the filtered view.
    pub number: usize,
    pub cells: Vec<String>,
}

/// Header labels for a view, including optional columns it carries.
pub fn headers(view: &FilteredView) -> Vec<&'static str> {
    let mut out = vec!["#"];
    out.extend(columns::REQUIRED);
    if view.has_field(OptionalField::Gender) {
        out.push(columns::GENDER);
    }
    if view.has_field(OptionalField::BirthYear) {
        out.push(columns::BIRTH_YEAR);
    }
    out
}

/// Convert the records of `page` into display rows.
pub fn page_rows(page: &Page, view: &FilteredView) -> Vec<TableRowData> {
    let with_gender = view.has_field(OptionalField::Gender);
    let with_birth_year = view.has_field(OptionalField::BirthYear);

    page.rows
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let number = page.offset + i + 1;
            let mut cells = vec![number.to_string()];
            cells.extend(record_cells(rec));
            if with_gender {
                cells.push(rec.gender.clone().unwrap_or_default());
            }
            if with_birth_year {
                cells.push(rec.birth_year.map(|y| y.to_string()).unwrap_or_default());
            }
            TableRowData { number, cells }
        })
        .collect()
}

fn record_cells(rec: &TripRecord) -> [String; 6] {
    [
        rec.start_time().format("%Y-%m-%d %H:%M:%S").to_string(),
        rec.end_time.clone(),
        formatting::format_number(rec.trip_duration, 0),
        rec.start_station.clone(),
        rec.end_station.clone(),
        rec.user_type.clone(),
    ]
}

/// Render `page` of `view` as a titled text table.
pub fn render_page(page: &Page, view: &FilteredView) -> String {
    if page.is_empty() {
        return render_no_data();
    }

    let header: Vec<String> = headers(view).into_iter().map(str::to_string).collect();
    let rows: Vec<Vec<String>> = page_rows(page, view)
        .into_iter()
        .map(|r| r.cells.into_iter().map(|c| truncate(&c, MAX_CELL_WIDTH)).collect())
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.width()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.width());
        }
    }

    let mut lines = vec![format!(
        "Rows {} to {} of {}",
        page.first_row_number(),
        page.last_row_number(),
        formatting::format_count(view.len())
    )];
    lines.push(join_row(&header, &widths));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join(GAP),
    );
    lines.extend(rows.iter().map(|row| join_row(row, &widths)));
    lines.join("\n")
}

/// Placeholder shown when a page has no rows.
fn render_no_data() -> String {
    "No rows to display for this selection.".to_string()
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn join_row(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| pad_right(cell, *w))
        .collect();
    padded.join(GAP).trim_end().to_string()
}

/// Pad `s` with spaces to `width` terminal columns.
pub(crate) fn pad_right(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    format!("{s}{}", " ".repeat(fill))
}

/// Cut `s` to at most `max` terminal columns, ending in `…` when shortened.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────
