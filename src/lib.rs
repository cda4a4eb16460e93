pub mod auth;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod directory;
pub mod error;
pub mod notification;
pub mod types;
pub mod view;

pub use auth::{Admission, LocalStorage, MemorySessionStore, Session, SessionStore};
pub use cache::{CollectionCache, Mutation};
pub use config::Config;
pub use directory::{DirectoryClient, HttpDirectoryClient};
pub use error::{ErrorKind, Result, RosterError};
pub use notification::{NoticeLevel, Notification};
pub use types::{Page, Record, RecordId, RecordPatch};
pub use view::{DirectoryView, Entry, Mode, ViewSettings, ViewSnapshot};
