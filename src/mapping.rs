//! Mapping result rows to timeline entries.
//!
//! Each row yields at most one entry. A row is dropped when it has no
//! date-like value or when that value does not resolve to an instant. The
//! id of an entry is the 1-based position of its row in the input, so ids
//! survive drops unchanged and may therefore have gaps.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::binding::ResultRow;
use crate::classify::find_date_binding;
use crate::datatype::{normalize_bare_year, parse_instant};

/// Label used when a row has no literal to show.
pub const NO_TITLE: &str = "(No title)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub id: u64,
    pub label: String,
    pub instant: DateTime<Utc>,
}

pub fn map_rows_to_entries(rows: &[ResultRow]) -> Vec<TimelineEntry> {
    let entries: Vec<TimelineEntry> = rows
        .iter()
        .enumerate()
        .filter_map(|(index, row)| map_row(index as u64 + 1, row))
        .collect();
    info!(rows = rows.len(), entries = entries.len(), "mapped bindings");
    entries
}

fn map_row(id: u64, row: &ResultRow) -> Option<TimelineEntry> {
    let Some((date_name, date_field)) = find_date_binding(row) else {
        debug!(id, "row has no date-like value");
        return None;
    };
    let Some(moment) = parse_instant(&normalize_bare_year(&date_field.value)) else {
        debug!(id, value = %date_field.value, "date value did not resolve");
        return None;
    };
    Some(TimelineEntry { id, label: resolve_label(row, date_name), instant: moment.instant })
}

/// The first literal other than the chosen date value, or [`NO_TITLE`].
///
/// Literals that are empty or whitespace only are not titles and are passed
/// over, so a blank first literal yields to a later one rather than to
/// [`NO_TITLE`]. Later date literals remain candidates.
pub fn resolve_label(row: &ResultRow, date_name: &str) -> String {
    row.fields()
        .filter(|(name, _)| *name != date_name)
        .filter_map(|(_, descriptor)| descriptor)
        .find(|d| d.is_literal() && !d.value.trim().is_empty())
        .map(|d| d.value.clone())
        .unwrap_or_else(|| NO_TITLE.to_string())
}
