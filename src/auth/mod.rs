//! Session handling: the token obtained at login, where it is persisted, and
//! the guard that checks for it before the directory is opened.

pub mod client;
pub mod guard;
pub mod store;

use std::fmt;

use secrecy::{ExposeSecret, SecretBox};

use crate::error::Result;

pub use client::HttpAuthClient;
pub use guard::{Admission, LOGIN_REQUIRED, admit};
pub use store::{LocalStorage, MemorySessionStore, SESSION_KEY};

/// An authenticated session. The token is opaque to this crate.
pub struct Session {
    token: SecretBox<String>,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretBox::new(Box::new(token.into())),
        }
    }

    pub fn token(&self) -> &SecretBox<String> {
        &self.token
    }
}

impl Clone for Session {
    fn clone(&self) -> Self {
        Self::new(self.token.expose_secret().clone())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Persistent home of the session token
pub trait SessionStore {
    /// Read the stored session, if any
    fn load(&self) -> Result<Option<Session>>;

    /// Persist a session, replacing any previous one
    fn save(&self, session: &Session) -> Result<()>;

    /// Forget the stored session
    fn clear(&self) -> Result<()>;
}

/// Log in with `client` and persist the resulting session in `store`.
pub async fn login(
    client: &HttpAuthClient,
    store: &impl SessionStore,
    email: &str,
    password: &str,
) -> Result<Session> {
    let session = client.login(email, password).await?;
    store.save(&session)?;
    tracing::debug!("session stored after login");
    Ok(session)
}

/// Destroy the stored session.
pub fn logout(store: &impl SessionStore) -> Result<()> {
    store.clear()?;
    tracing::debug!("session cleared");
    Ok(())
}
