//! One-shot directory commands: list, search, edit, delete.

use serde_json::json;

use super::format::{render_record, render_snapshot};
use super::{open_directory, print_json};
use crate::config::Config;
use crate::error::{Result, RosterError};
use crate::types::{RecordId, RecordPatch};

/// List one page of the directory
pub async fn cmd_list(page: u32, json: bool) -> Result<()> {
    let config = Config::load()?;
    let view = open_directory(&config)?;
    view.go_to_page(page).await?;

    let snapshot = view.snapshot();
    if json {
        print_json(&json!({
            "page": snapshot.page,
            "total_pages": snapshot.total_pages,
            "users": snapshot.records,
        }))?;
    } else {
        print!("{}", render_snapshot(&snapshot));
    }
    Ok(())
}

/// Search the whole directory by name
pub async fn cmd_search(term: &str, json: bool) -> Result<()> {
    if term.trim().is_empty() {
        return Err(RosterError::Validation(
            "search term cannot be empty".to_string(),
        ));
    }

    let config = Config::load()?;
    let view = open_directory(&config)?;
    view.set_search_term(term).await?;

    let snapshot = view.snapshot();
    if json {
        print_json(&json!({
            "term": term,
            "users": snapshot.records,
        }))?;
    } else {
        print!("{}", render_snapshot(&snapshot));
    }
    Ok(())
}

/// Update fields of a user
pub async fn cmd_edit(id: RecordId, patch: RecordPatch, json: bool) -> Result<()> {
    if patch.is_empty() {
        return Err(RosterError::Validation(
            "nothing to change. Pass at least one of --first-name, --last-name, --email, --avatar"
                .to_string(),
        ));
    }

    let config = Config::load()?;
    let view = open_directory(&config)?;
    view.locate(id).await?;
    let updated = view.update(id, patch).await?;

    if json {
        print_json(&serde_json::to_value(&updated)?)?;
    } else {
        if let Some(notice) = &view.snapshot().notice {
            println!("{}", super::format::render_notice(notice));
        }
        println!("{}", render_record(&updated));
    }
    Ok(())
}

/// Delete a user
pub async fn cmd_delete(id: RecordId, json: bool) -> Result<()> {
    let config = Config::load()?;
    let view = open_directory(&config)?;
    let record = view.locate(id).await?;
    view.delete(id).await?;

    if json {
        print_json(&json!({
            "deleted": record.id,
            "name": record.full_name(),
        }))?;
    } else if let Some(notice) = &view.snapshot().notice {
        println!("{}", super::format::render_notice(notice));
    }
    Ok(())
}
