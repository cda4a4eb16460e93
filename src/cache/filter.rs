//! Name search over directory records.
//!
//! Matching is a case-insensitive substring test against the record's
//! `"{first_name} {last_name}"`. Results keep the input order.

use crate::types::Record;

/// Check whether `record`'s full name contains `term`, ignoring case
pub fn full_name_matches(record: &Record, term: &str) -> bool {
    record
        .full_name()
        .to_lowercase()
        .contains(&term.to_lowercase())
}

/// Filter records by name, preserving order
pub fn filter_records<'a, I>(records: I, term: &str) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .filter(|record| full_name_matches(record, term))
        .collect()
}
