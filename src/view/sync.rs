//! Local checks that run before a mutation reaches the network.

use crate::cache::CollectionCache;
use crate::error::{Result, RosterError};
use crate::types::{Record, RecordId, RecordPatch};

pub const INVALID_FIELDS: &str = "Please fill all fields with valid data.";

/// Reject a record with a blank name or an email without `@`
pub fn validate(record: &Record) -> Result<()> {
    let valid = !record.first_name.trim().is_empty()
        && !record.last_name.trim().is_empty()
        && record.email.contains('@');
    if valid {
        Ok(())
    } else {
        Err(RosterError::Validation(INVALID_FIELDS.to_string()))
    }
}

/// Merge `patch` onto the cached record and validate the result.
pub fn plan_update(cache: &CollectionCache, id: RecordId, patch: &RecordPatch) -> Result<Record> {
    if patch.is_empty() {
        return Err(RosterError::Validation("no fields to update".to_string()));
    }
    let current = cache.get(id).ok_or(RosterError::RecordNotFound(id))?;
    let merged = patch.apply_to(current);
    validate(&merged)?;
    Ok(merged)
}
