//! Interactive line-oriented browser over the directory.
//!
//! Each input line is one command; the view is re-rendered after every
//! command. Errors are shown and the loop keeps going.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};

use super::admitted;
use super::format::render_snapshot;
use crate::auth::LocalStorage;
use crate::config::Config;
use crate::directory::{DirectoryClient, HttpDirectoryClient};
use crate::error::{Result, RosterError};
use crate::types::{RecordId, RecordPatch};
use crate::view::{DirectoryView, ViewSettings};

const HELP: &str = "\
Commands:
  n, next              next page
  p, prev              previous page
  g <page>             go to page
  / <term>             search by name (a bare / clears the search)
  e <id> field=value   edit a user (first_name, last_name, email, avatar)
  d <id>               delete a user
  r                    refresh
  h, help              show this help
  q, quit              quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Next,
    Previous,
    GoTo(u32),
    Search(String),
    ClearSearch,
    Edit(RecordId, RecordPatch),
    Delete(RecordId),
    Refresh,
    Help,
    Quit,
}

/// Parse one line of browser input
pub fn parse_browse_command(line: &str) -> Result<BrowseCommand> {
    let line = line.trim();
    if let Some(term) = line.strip_prefix('/') {
        let term = term.strip_prefix(' ').unwrap_or(term);
        return Ok(if term.trim().is_empty() {
            BrowseCommand::ClearSearch
        } else {
            BrowseCommand::Search(term.to_string())
        });
    }

    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    match (command, args.as_slice()) {
        ("n" | "next", []) => Ok(BrowseCommand::Next),
        ("p" | "prev" | "previous", []) => Ok(BrowseCommand::Previous),
        ("g" | "goto", [page]) => page
            .parse()
            .map(BrowseCommand::GoTo)
            .map_err(|_| RosterError::Validation(format!("invalid page '{page}'"))),
        ("e" | "edit", [id, fields @ ..]) if !fields.is_empty() => {
            Ok(BrowseCommand::Edit(id.parse()?, parse_assignments(fields)?))
        }
        ("d" | "delete", [id]) => Ok(BrowseCommand::Delete(id.parse()?)),
        ("r" | "refresh", []) => Ok(BrowseCommand::Refresh),
        ("h" | "help" | "?", []) => Ok(BrowseCommand::Help),
        ("q" | "quit" | "exit", []) => Ok(BrowseCommand::Quit),
        _ => Err(RosterError::Validation(format!(
            "unknown command '{line}'. Type h for help"
        ))),
    }
}

/// Parse `field=value` pairs into a patch
fn parse_assignments(fields: &[&str]) -> Result<RecordPatch> {
    let mut patch = RecordPatch::default();
    for field in fields {
        let Some((name, value)) = field.split_once('=') else {
            return Err(RosterError::Validation(format!(
                "expected field=value, got '{field}'"
            )));
        };
        let value = Some(value.to_string());
        match name {
            "first_name" => patch.first_name = value,
            "last_name" => patch.last_name = value,
            "email" => patch.email = value,
            "avatar" => patch.avatar = value,
            _ => {
                return Err(RosterError::Validation(format!(
                    "unknown field '{name}'"
                )));
            }
        }
    }
    Ok(patch)
}

/// Run one command against the view. Returns `false` when the user quits.
async fn dispatch<C: DirectoryClient>(view: &DirectoryView<C>, command: BrowseCommand) -> Result<bool> {
    match command {
        BrowseCommand::Next => view.next_page().await?,
        BrowseCommand::Previous => view.previous_page().await?,
        BrowseCommand::GoTo(page) => view.go_to_page(page).await?,
        BrowseCommand::Search(term) => view.set_search_term(&term).await?,
        BrowseCommand::ClearSearch => view.clear_search().await?,
        BrowseCommand::Edit(id, patch) => {
            view.update(id, patch).await?;
        }
        BrowseCommand::Delete(id) => view.delete(id).await?,
        BrowseCommand::Refresh => view.refresh().await?,
        BrowseCommand::Help => println!("{HELP}"),
        BrowseCommand::Quit => return Ok(false),
    }
    Ok(true)
}

/// Browse the directory interactively
pub async fn cmd_browse() -> Result<()> {
    let config = Config::load()?;
    let storage = LocalStorage::open_default()?;
    let entry = DirectoryView::enter(
        &storage,
        |session| Ok(HttpDirectoryClient::from_config(&config)?.with_session(session)),
        ViewSettings::from_config(&config),
    )
    .await?;
    let view = admitted(entry)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print!("{}", render_snapshot(&view.snapshot()));

    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let keep_going = match parse_browse_command(&line) {
            Ok(BrowseCommand::Help) => {
                println!("{HELP}");
                continue;
            }
            Ok(command) => match dispatch(&view, command).await {
                Ok(keep_going) => keep_going,
                Err(e) => {
                    eprintln!("{e}");
                    true
                }
            },
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };
        if !keep_going {
            break;
        }
        print!("{}", render_snapshot(&view.snapshot()));
    }
    Ok(())
}
