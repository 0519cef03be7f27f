//! Durable storage for the current session token.
//!
//! DESIGN
//! ======
//! Mirrors a browser origin's key-value storage: one entry under a fixed key,
//! overwritten on every login and removed on logout. Token values are opaque;
//! nothing here inspects or validates their shape.
//!
//! TRADE-OFFS
//! ==========
//! The file store rewrites the whole document on every mutation (temp file +
//! rename). The document holds a single entry, so there is nothing to gain
//! from partial updates.

#[cfg(test)]
#[path = "credentials_test.rs"]
mod credentials_test;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Fixed key the session token is stored under.
pub const TOKEN_KEY: &str = "token";

/// Errors produced by credential store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("credential store io failed at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backing file exists but is not a key-value document.
    #[error("credential store at {} is corrupt: {message}", path.display())]
    Corrupt { path: PathBuf, message: String },
}

/// Storage contract for the single session token.
///
/// `set` overwrites any prior token and is durable once it returns. `clear`
/// succeeds when no token is stored.
pub trait CredentialStore: Send + Sync {
    /// Return the stored token, or `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing storage cannot be read.
    fn get(&self) -> Result<Option<String>, StoreError>;

    /// Persist `token`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing storage cannot be written.
    fn set(&self, token: &str) -> Result<(), StoreError>;

    /// Remove the stored token.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing storage cannot be written.
    fn clear(&self) -> Result<(), StoreError>;
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// Process-local store. Clones share one backing map, the same way every tab
/// of a browser origin shares one storage area.
#[derive(Clone, Debug, Default)]
pub struct MemoryCredentialStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `token`.
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store.entries().insert(TOKEN_KEY.to_owned(), token.to_owned());
        store
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        Ok(self.entries().get(TOKEN_KEY).cloned())
    }

    fn set(&self, token: &str) -> Result<(), StoreError> {
        self.entries().insert(TOKEN_KEY.to_owned(), token.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.entries().remove(TOKEN_KEY);
        Ok(())
    }
}

// =============================================================================
// FILE STORE
// =============================================================================

/// JSON key-value file holding the token for one API origin.
#[derive(Clone, Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store scoped to the origin of `api_url`, under `dir`.
    #[must_use]
    pub fn for_origin(dir: &Path, api_url: &str) -> Self {
        Self::new(dir.join(format!("{}.json", origin_slug(api_url))))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => return Err(StoreError::Io { path: self.path.clone(), source }),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt { path: self.path.clone(), message: e.to_string() })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let io_err = |source: io::Error| StoreError::Io { path: self.path.clone(), source };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let body = serde_json::to_string_pretty(entries)
            .map_err(|e| StoreError::Corrupt { path: self.path.clone(), message: e.to_string() })?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).map_err(io_err)?;
        restrict_permissions(&tmp).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        Ok(self.read_entries()?.remove(TOKEN_KEY))
    }

    fn set(&self, token: &str) -> Result<(), StoreError> {
        let mut entries = self.read_entries()?;
        entries.insert(TOKEN_KEY.to_owned(), token.to_owned());
        self.write_entries(&entries)
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut entries = self.read_entries()?;
        if entries.remove(TOKEN_KEY).is_none() {
            return Ok(());
        }
        if !entries.is_empty() {
            return self.write_entries(&entries);
        }
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path: self.path.clone(), source }),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// File-name-safe identifier for the scheme, host and port of `api_url`.
///
/// Paths and query strings do not affect the result, so every endpoint of one
/// server shares a store.
#[must_use]
pub fn origin_slug(api_url: &str) -> String {
    let origin = match reqwest::Url::parse(api_url) {
        Ok(url) => match (url.host_str(), url.port_or_known_default()) {
            (Some(host), Some(port)) => format!("{}_{host}_{port}", url.scheme()),
            (Some(host), None) => format!("{}_{host}", url.scheme()),
            _ => api_url.to_owned(),
        },
        Err(_) => api_url.to_owned(),
    };
    origin
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
        .collect()
}
