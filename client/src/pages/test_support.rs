//! Shared fixtures for page tests.

use std::sync::Arc;

use crate::config::HttpTimeouts;
use crate::net::api::ApiClient;
use crate::state::auth::AuthProvider;
use crate::state::credentials::MemoryCredentialStore;
use crate::state::notify::{NoticeKind, Notifier};

pub(crate) struct Fixture {
    pub api: ApiClient,
    pub store: MemoryCredentialStore,
    pub auth: AuthProvider,
    pub notifier: Notifier,
}

impl Fixture {
    /// Fixture against `server`, with `token` pre-stored when given.
    pub fn new(server: &mockito::Server, token: Option<&str>) -> Self {
        let store = match token {
            Some(token) => MemoryCredentialStore::with_token(token),
            None => MemoryCredentialStore::new(),
        };
        let auth = AuthProvider::initialize(Arc::new(store.clone()));
        let api = ApiClient::new(&server.url(), HttpTimeouts::default()).unwrap();
        Self { api, store, auth, notifier: Notifier::default() }
    }

    /// Current notice as `(kind, message)`.
    pub fn notice(&self) -> Option<(NoticeKind, String)> {
        self.notifier.current().map(|n| (n.kind, n.message))
    }
}
