//! Text rendering of directory views.

use owo_colors::{OwoColorize, Stream};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::notification::{NoticeLevel, Notification};
use crate::types::Record;
use crate::view::{NO_USERS, ViewSnapshot};

/// A row in the user table
#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Avatar")]
    avatar: String,
}

impl From<&Record> for RecordRow {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id.to_string(),
            name: record.full_name(),
            email: record.email.clone(),
            avatar: record.avatar.clone(),
        }
    }
}

/// Render records as a table, or the empty-state message
pub fn render_records(records: &[Record]) -> String {
    if records.is_empty() {
        return NO_USERS.to_string();
    }
    let mut table = Table::new(records.iter().map(RecordRow::from));
    table.with(Style::rounded());
    table.to_string()
}

/// Render a single record as `field: value` lines
pub fn render_record(record: &Record) -> String {
    let label = |name: &str| {
        format!("{name}:")
            .if_supports_color(Stream::Stdout, |t| t.cyan())
            .to_string()
    };
    format!(
        "{} {}\n{} {}\n{} {}\n{} {}\n{} {}",
        label("id"),
        record.id,
        label("first_name"),
        record.first_name,
        label("last_name"),
        record.last_name,
        label("email"),
        record.email,
        label("avatar"),
        record.avatar,
    )
}

pub fn render_notice(notice: &Notification) -> String {
    match notice.level {
        NoticeLevel::Success => notice
            .message
            .if_supports_color(Stream::Stdout, |t| t.green())
            .to_string(),
        NoticeLevel::Error => notice
            .message
            .if_supports_color(Stream::Stdout, |t| t.red())
            .to_string(),
    }
}

/// Render everything a snapshot shows: a search header, the records,
/// the pagination line and any live notification.
pub fn render_snapshot(snapshot: &ViewSnapshot) -> String {
    let mut out = String::new();

    if let Some(term) = snapshot.mode.term() {
        out.push_str(&format!("Search results for: \"{term}\"\n\n"));
    }
    out.push_str(&render_records(&snapshot.records));
    out.push('\n');

    if let Some(label) = snapshot.page_label() {
        let mut controls = Vec::new();
        if snapshot.can_go_previous {
            controls.push("[p]revious");
        }
        if snapshot.can_go_next {
            controls.push("[n]ext");
        }
        out.push_str(&label);
        if !controls.is_empty() {
            out.push_str(&format!(
                "  {}",
                controls
                    .join(" ")
                    .if_supports_color(Stream::Stdout, |t| t.dimmed())
            ));
        }
        out.push('\n');
    }

    if let Some(notice) = &snapshot.notice {
        out.push_str(&render_notice(notice));
        out.push('\n');
    }
    out
}
