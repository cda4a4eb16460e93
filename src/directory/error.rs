//! HTTP failure mapping for the directory and login endpoints.
//!
//! Every non-2xx response is captured as an [`ApiError`] and then converted
//! into the matching [`RosterError`] kind, so callers only ever see network,
//! validation, or auth failures.

use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::RosterError;

/// Shown when a login failure carries no message of its own
pub const LOGIN_FAILED: &str = "Login failed. Check your credentials.";

/// The remote operation that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListPage,
    Update,
    Delete,
    Login,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::ListPage => write!(f, "list users"),
            Operation::Update => write!(f, "update user"),
            Operation::Delete => write!(f, "delete user"),
            Operation::Login => write!(f, "login"),
        }
    }
}

/// Error body the account service sends with failures: `{ "error": "..." }`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// A non-2xx response from the account service.
#[derive(Debug)]
pub struct ApiError {
    pub operation: Operation,
    pub status: StatusCode,
    /// The service's `error` string, when the body carried one
    pub server_message: Option<String>,
}

impl ApiError {
    /// Build an error from a response status and its raw body.
    pub fn from_response(operation: Operation, status: StatusCode, body: &str) -> Self {
        let server_message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.trim().is_empty());
        Self {
            operation,
            status,
            server_message,
        }
    }

    fn is_auth_failure(&self) -> bool {
        matches!(self.status.as_u16(), 401 | 403)
    }

    fn is_rejected_input(&self) -> bool {
        matches!(self.status.as_u16(), 400 | 422)
    }

    /// Convert into the user-facing error kind for this operation.
    pub fn to_roster_error(&self) -> RosterError {
        match self.operation {
            Operation::Login => RosterError::Auth(
                self.server_message
                    .clone()
                    .unwrap_or_else(|| LOGIN_FAILED.to_string()),
            ),
            _ if self.is_auth_failure() => RosterError::Auth(self.to_string()),
            Operation::Update if self.is_rejected_input() => {
                RosterError::Validation(self.to_string())
            }
            _ => RosterError::Network(self.to_string()),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = self.status.canonical_reason().unwrap_or("Unknown");
        write!(
            f,
            "{} failed ({} {})",
            self.operation,
            self.status.as_u16(),
            reason
        )?;
        if let Some(message) = &self.server_message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

impl From<ApiError> for RosterError {
    fn from(error: ApiError) -> Self {
        error.to_roster_error()
    }
}
