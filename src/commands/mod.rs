mod browse;
mod config;
mod directory;
pub mod format;
mod session;

pub use browse::{BrowseCommand, cmd_browse, parse_browse_command};
pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use directory::{cmd_delete, cmd_edit, cmd_list, cmd_search};
pub use session::{cmd_login, cmd_logout};

use serde_json::Value;

use crate::auth::{LOGIN_REQUIRED, LocalStorage};
use crate::config::Config;
use crate::directory::HttpDirectoryClient;
use crate::error::{Result, RosterError};
use crate::view::{DirectoryView, Entry, ViewSettings};

/// Print a JSON value to stdout with pretty formatting
pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Open the directory for the stored session without fetching anything.
///
/// A missing session is an auth error pointing at `roster login`.
pub(crate) fn open_directory(config: &Config) -> Result<DirectoryView<HttpDirectoryClient>> {
    let storage = LocalStorage::open_default()?;
    let entry = DirectoryView::open(
        &storage,
        |session| Ok(HttpDirectoryClient::from_config(config)?.with_session(session)),
        ViewSettings::from_config(config),
    )?;
    admitted(entry)
}

/// The opened view, or an auth error pointing at `roster login`
pub(crate) fn admitted<C>(entry: Entry<C>) -> Result<DirectoryView<C>> {
    entry
        .into_view()
        .ok_or_else(|| RosterError::Auth(LOGIN_REQUIRED.to_string()))
}
