//! Deciding which bound values can place a row on a timeline.

use crate::binding::{ResultRow, ValueDescriptor};
use crate::datatype::parse_instant;

/// True when the descriptor is a literal whose datatype names a date or
/// date-time and whose value parses to a real instant.
///
/// The datatype test is a case-sensitive substring match, so both
/// `xsd:date` and `xsd:dateTime` qualify, as does any other IRI containing
/// `date`. URIs and blank nodes never qualify.
pub fn is_date_like(descriptor: &ValueDescriptor) -> bool {
    has_date_datatype(descriptor) && parse_instant(&descriptor.value).is_some()
}

/// The type and datatype half of [`is_date_like`]: a literal with a
/// non-empty datatype mentioning `date`. The value itself is not inspected.
pub fn has_date_datatype(descriptor: &ValueDescriptor) -> bool {
    if !descriptor.is_literal() {
        return false;
    }
    match descriptor.datatype.as_deref() {
        Some(d) if !d.is_empty() => d.contains("dateTime") || d.contains("date"),
        _ => false,
    }
}

/// The first date-like value of the row, in row order. Later date-like values are ignored.
pub fn find_date_field(row: &ResultRow) -> Option<&ValueDescriptor> {
    find_date_binding(row).map(|(_, descriptor)| descriptor)
}

/// Like [`find_date_field`], also naming the variable it was bound to.
pub fn find_date_binding(row: &ResultRow) -> Option<(&str, &ValueDescriptor)> {
    row.fields()
        .find_map(|(name, descriptor)| descriptor.filter(|d| is_date_like(d)).map(|d| (name, d)))
}

/// Pre-flight check: true iff any row holds a literal with a date datatype.
///
/// Only type and datatype are checked, so a batch whose sole date literal
/// fails to parse passes here yet maps to no entries.
pub fn can_form_timeline(rows: &[ResultRow]) -> bool {
    rows.iter().any(|row| row.values().any(has_date_datatype))
}
