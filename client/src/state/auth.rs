//! Auth-session state for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by the router's guard and by pages that perform authentication
//! (login, logout, account deletion) to coordinate redirects and
//! identity-dependent behavior.
//!
//! DESIGN
//! ======
//! The auth flag is cached in memory. It is read from the credential store
//! once in [`AuthProvider::initialize`] and afterwards changes only through
//! `login`/`logout` (or an explicit `resync`). A token removed from the store
//! by other means leaves the flag stale until the next initialize.
//!
//! Consumers observe the flag through a `watch` channel: each subscriber sees
//! the latest value, never a backlog of transitions.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use super::credentials::CredentialStore;

/// The two states of the session gate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthStatus {
    #[default]
    Anonymous,
    Authenticated,
}

impl From<bool> for AuthStatus {
    fn from(authenticated: bool) -> Self {
        if authenticated { Self::Authenticated } else { Self::Anonymous }
    }
}

/// Shared handle to the session state. Clones observe and mutate the same flag.
#[derive(Clone)]
pub struct AuthProvider {
    store: Arc<dyn CredentialStore>,
    flag: Arc<watch::Sender<bool>>,
}

impl AuthProvider {
    /// Read the credential store once and seed the flag from token presence.
    ///
    /// A store that cannot be read is treated as holding no token.
    pub fn initialize(store: Arc<dyn CredentialStore>) -> Self {
        let authenticated = read_token_present(store.as_ref());
        tracing::debug!(authenticated, "auth state initialized");
        let (flag, _) = watch::channel(authenticated);
        Self { store, flag: Arc::new(flag) }
    }

    /// Mark the session authenticated.
    ///
    /// Callers must have stored the token with [`CredentialStore::set`] first;
    /// this does not write or check the store.
    pub fn login(&self) {
        tracing::debug!("auth login");
        self.publish(true);
    }

    /// Clear the stored token and mark the session anonymous.
    ///
    /// Always leaves the flag `false`. A store failure is logged, not returned.
    pub fn logout(&self) {
        tracing::debug!("auth logout");
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "failed to clear credential store during logout");
        }
        self.publish(false);
    }

    /// Re-read the credential store and publish the result if it differs.
    ///
    /// Only the opt-in navigation resync uses this; the default lifecycle
    /// reads the store once.
    pub fn resync(&self) -> bool {
        let authenticated = read_token_present(self.store.as_ref());
        if self.publish(authenticated) {
            tracing::debug!(authenticated, "auth state resynced from store");
        }
        authenticated
    }

    /// Cached flag. No I/O.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        *self.flag.borrow()
    }

    #[must_use]
    pub fn status(&self) -> AuthStatus {
        AuthStatus::from(self.is_authenticated())
    }

    /// Receiver notified whenever the flag changes value.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.flag.subscribe()
    }

    /// The credential store this provider was initialized from.
    #[must_use]
    pub fn credentials(&self) -> Arc<dyn CredentialStore> {
        Arc::clone(&self.store)
    }

    /// Set the flag, notifying subscribers only on an actual change.
    fn publish(&self, authenticated: bool) -> bool {
        self.flag.send_if_modified(|current| {
            if *current == authenticated {
                return false;
            }
            *current = authenticated;
            true
        })
    }
}

impl fmt::Debug for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthProvider").field("authenticated", &self.is_authenticated()).finish_non_exhaustive()
    }
}

fn read_token_present(store: &dyn CredentialStore) -> bool {
    match store.get() {
        Ok(token) => token.is_some(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read credential store; treating session as anonymous");
            false
        }
    }
}
