//! Entry check for the directory view.
//!
//! The guard only looks for a stored token. It does not ask the server
//! whether the token is still valid; a rejected token shows up as an error on
//! the first directory request instead.

use crate::error::Result;

use super::{Session, SessionStore};

pub const LOGIN_REQUIRED: &str =
    "not logged in. Run: roster login --email <email> --password <password>";

/// Outcome of the entry check
#[derive(Debug)]
pub enum Admission {
    Admitted(Session),
    RedirectToLogin,
}

/// Read the session token once and decide whether the directory may open.
pub fn admit(store: &impl SessionStore) -> Result<Admission> {
    match store.load()? {
        Some(session) => Ok(Admission::Admitted(session)),
        None => {
            tracing::debug!("no session token; redirecting to login");
            Ok(Admission::RedirectToLogin)
        }
    }
}
