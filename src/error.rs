use thiserror::Error;

use crate::types::RecordId;

#[derive(Error, Debug)]
pub enum RosterError {
    // Directory errors
    #[error("network error: {0}")]
    Network(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("user {0} not found")]
    RecordNotFound(RecordId),

    #[error("page {requested} is out of range (1..={total_pages})")]
    PageOutOfRange { requested: u32, total_pages: u32 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// User-facing classification of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Validation,
    Auth,
    Other,
}

impl RosterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RosterError::Network(_) => ErrorKind::Network,
            RosterError::Validation(_)
            | RosterError::RecordNotFound(_)
            | RosterError::PageOutOfRange { .. } => ErrorKind::Validation,
            RosterError::Auth(_) => ErrorKind::Auth,
            _ => ErrorKind::Other,
        }
    }
}

impl From<reqwest::Error> for RosterError {
    fn from(err: reqwest::Error) -> Self {
        RosterError::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
