//! Session storage backends.
//!
//! [`LocalStorage`] is a small string key/value file, the terminal analogue
//! of a browser's local storage. The session token lives under
//! [`SESSION_KEY`].

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use parking_lot::Mutex;
use secrecy::ExposeSecret;

use crate::config::Config;
use crate::error::{Result, RosterError};

use super::{Session, SessionStore};

/// Fixed key under which the session token is stored
pub const SESSION_KEY: &str = "token";

const STORAGE_FILE: &str = "storage.json";

/// File-backed string key/value storage
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage file inside the configured data directory
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(Config::data_dir()?.join(STORAGE_FILE)))
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| {
            RosterError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read storage at {}: {}", self.path.display(), e),
            ))
        })?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;

        // Owner read/write only; the file holds a credential
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

impl SessionStore for LocalStorage {
    fn load(&self) -> Result<Option<Session>> {
        Ok(self
            .get(SESSION_KEY)?
            .filter(|token| !token.is_empty())
            .map(Session::new))
    }

    fn save(&self, session: &Session) -> Result<()> {
        self.set(SESSION_KEY, session.token().expose_secret())
    }

    fn clear(&self) -> Result<()> {
        self.remove(SESSION_KEY)
    }
}

/// In-process session store
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>> {
        Ok(self.token.lock().clone().map(Session::new))
    }

    fn save(&self, session: &Session) -> Result<()> {
        *self.token.lock() = Some(session.token().expose_secret().clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.lock() = None;
        Ok(())
    }
}
