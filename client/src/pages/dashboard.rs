//! Dashboard page: greeting and journal entry CRUD.
//!
//! SYSTEM CONTEXT
//! ==============
//! Only reachable through the guard. Every call still reads the token from
//! the credential store, so a token cleared underneath a stale auth flag
//! surfaces as an unauthorized notice rather than a request without a
//! bearer header.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use std::sync::Arc;

use super::{NO_TOKEN_MESSAGE, report_failure};
use crate::net::api::{ApiClient, ApiError, stored_token};
use crate::net::types::{EntryDraft, JournalEntry};
use crate::state::credentials::CredentialStore;
use crate::state::notify::Notifier;

pub const GREETING_FAILED_MESSAGE: &str = "Failed to fetch username.";
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch journal entries.";
pub const CREATE_FAILED_MESSAGE: &str = "Failed to create journal entry.";
pub const UPDATE_FAILED_MESSAGE: &str = "Failed to update journal entry.";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete journal entry.";
pub const CREATED_MESSAGE: &str = "Entry created successfully.";
pub const UPDATED_MESSAGE: &str = "Entry updated successfully.";
pub const DELETED_MESSAGE: &str = "Entry deleted successfully.";

#[derive(Clone)]
pub struct DashboardPage {
    api: ApiClient,
    store: Arc<dyn CredentialStore>,
    notifier: Notifier,
}

impl DashboardPage {
    #[must_use]
    pub fn new(api: ApiClient, store: Arc<dyn CredentialStore>, notifier: Notifier) -> Self {
        Self { api, store, notifier }
    }

    /// Header text: the server's greeting, or the reason it is unavailable.
    pub async fn greeting(&self) -> String {
        let result = match self.token() {
            Ok(token) => self.api.greeting(&token).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(text) => text,
            Err(ApiError::MissingToken) => NO_TOKEN_MESSAGE.to_owned(),
            Err(e) => {
                tracing::debug!(error = %e, "greeting failed");
                GREETING_FAILED_MESSAGE.to_owned()
            }
        }
    }

    /// Every entry of the signed-in user, or `None` after a reported failure.
    pub async fn entries(&self) -> Option<Vec<JournalEntry>> {
        let result = match self.token() {
            Ok(token) => self.api.fetch_entries(&token).await,
            Err(e) => Err(e),
        };
        result.map_err(|e| report_failure(&self.notifier, &e, FETCH_FAILED_MESSAGE)).ok()
    }

    /// Create an entry. Returns whether it was saved.
    pub async fn create_entry(&self, title: &str, content: &str) -> bool {
        let draft = EntryDraft { title: title.to_owned(), content: content.to_owned() };
        let result = match self.token() {
            Ok(token) => self.api.create_entry(&token, &draft).await,
            Err(e) => Err(e),
        };
        self.finish(result, CREATED_MESSAGE, CREATE_FAILED_MESSAGE, false)
    }

    /// Replace the title and content of entry `id`. Returns whether it was saved.
    pub async fn update_entry(&self, id: &str, title: &str, content: &str) -> bool {
        let draft = EntryDraft { title: title.to_owned(), content: content.to_owned() };
        let result = match self.token() {
            Ok(token) => self.api.update_entry(&token, id, &draft).await,
            Err(e) => Err(e),
        };
        self.finish(result, UPDATED_MESSAGE, UPDATE_FAILED_MESSAGE, false)
    }

    /// Delete entry `id`. Returns whether it was removed.
    pub async fn delete_entry(&self, id: &str) -> bool {
        let result = match self.token() {
            Ok(token) => self.api.delete_entry(&token, id).await,
            Err(e) => Err(e),
        };
        self.finish(result, DELETED_MESSAGE, DELETE_FAILED_MESSAGE, true)
    }

    fn token(&self) -> Result<String, ApiError> {
        stored_token(self.store.as_ref())
    }

    fn finish(&self, result: Result<(), ApiError>, success: &str, failure: &str, warn_on_success: bool) -> bool {
        match result {
            Ok(()) if warn_on_success => self.notifier.warning(success),
            Ok(()) => self.notifier.success(success),
            Err(e) => {
                report_failure(&self.notifier, &e, failure);
                return false;
            }
        }
        true
    }
}
