use clap::{Parser, Subcommand};

use crate::types::{RecordId, RecordPatch};

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Browse, search, and edit a remote user directory")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session token
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },

    /// Forget the stored session token
    Logout,

    /// List one page of users
    #[command(visible_alias = "ls")]
    List {
        /// Page number (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search all users by name
    Search {
        /// Case-insensitive substring of "first last"
        term: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change fields of a user
    Edit {
        /// User ID
        id: RecordId,

        #[command(flatten)]
        fields: EditFields,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a user
    #[command(visible_alias = "rm")]
    Delete {
        /// User ID
        id: RecordId,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Browse the directory interactively
    Browse,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Fields accepted by `roster edit`
#[derive(clap::Args, Debug, Default)]
pub struct EditFields {
    /// New first name
    #[arg(long)]
    pub first_name: Option<String>,

    /// New last name
    #[arg(long)]
    pub last_name: Option<String>,

    /// New email address
    #[arg(long)]
    pub email: Option<String>,

    /// New avatar URL
    #[arg(long)]
    pub avatar: Option<String>,
}

impl From<EditFields> for RecordPatch {
    fn from(fields: EditFields) -> Self {
        Self {
            first_name: fields.first_name,
            last_name: fields.last_name,
            email: fields.email,
            avatar: fields.avatar,
        }
    }
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a configuration value
    Get {
        /// One of: base_url, request_timeout, notice_ttl
        key: String,
    },

    /// Set a configuration value
    Set {
        /// One of: base_url, request_timeout, notice_ttl
        key: String,

        value: String,
    },
}
