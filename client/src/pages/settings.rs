//! Settings page: profile, email and password changes, account deletion.
//!
//! Account deletion is the one settings action that drives an auth
//! transition: on success it logs the session out.
//!
//! DESIGN
//! ======
//! Every action re-fetches the profile before it runs, and the account
//! checks (demo account, same email, the `userName` sent with a password
//! change) use only that fresh copy. A profile cached from an earlier
//! session is never acted on: any auth transition since it was loaded
//! hides it from [`SettingsPage::profile`].

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;

use tokio::sync::watch;

use super::FormOutcome;
use crate::net::api::{ApiClient, ApiError, stored_token};
use crate::net::types::{EmailUpdate, PasswordUpdate, UserProfile};
use crate::router::View;
use crate::state::auth::AuthProvider;
use crate::state::notify::Notifier;

/// Shared demonstration account; read-only.
pub const DEMO_USERNAME: &str = "demouser";

pub const PROFILE_FAILED_MESSAGE: &str = "Failed to fetch user details.";
pub const DEMO_EMAIL_MESSAGE: &str = "Demo users cannot update their email.";
pub const DEMO_DELETE_MESSAGE: &str = "Demo users cannot delete their account.";
pub const SAME_EMAIL_MESSAGE: &str = "Please enter a different email address";
pub const EMAIL_UPDATED_MESSAGE: &str = "Email updated successfully!";
pub const EMAIL_FAILED_MESSAGE: &str = "Failed to update email";
pub const PASSWORD_MISMATCH_MESSAGE: &str = "Passwords do not match";
pub const PASSWORD_UPDATED_MESSAGE: &str = "Password updated successfully!";
pub const PASSWORD_FAILED_MESSAGE: &str = "Failed to update password";
pub const RELOGIN_MESSAGE: &str = "Please log in again.";
pub const TOKEN_SAVE_FAILED_MESSAGE: &str = "Password updated, but the new session could not be saved. Please log in again.";
pub const ACCOUNT_DELETED_MESSAGE: &str = "Account deleted successfully.";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete account. Please try again.";

/// New password and confirmation must match and be non-empty.
pub(crate) fn passwords_match(new_password: &str, confirm_password: &str) -> bool {
    !new_password.is_empty() && new_password == confirm_password
}

#[derive(Clone, Debug)]
pub struct SettingsPage {
    api: ApiClient,
    auth: AuthProvider,
    auth_changes: watch::Receiver<bool>,
    notifier: Notifier,
    profile: Option<UserProfile>,
}

impl SettingsPage {
    #[must_use]
    pub fn new(api: ApiClient, auth: AuthProvider, notifier: Notifier) -> Self {
        let auth_changes = auth.subscribe();
        Self { api, auth, auth_changes, notifier, profile: None }
    }

    /// Profile loaded during the current session, if any.
    #[must_use]
    pub fn profile(&self) -> Option<&UserProfile> {
        if self.auth_changes.has_changed().unwrap_or(true) {
            return None;
        }
        self.profile.as_ref()
    }

    fn token(&self) -> Result<String, ApiError> {
        stored_token(self.auth.credentials().as_ref())
    }

    /// Fetch the profile. Without a stored token nothing is requested.
    ///
    /// The previous profile is dropped first, so a failed fetch leaves none.
    pub async fn load_profile(&mut self) -> Option<&UserProfile> {
        let Ok(token) = self.token() else {
            self.profile = None;
            return None;
        };
        self.fetch_profile(&token).await
    }

    async fn fetch_profile(&mut self, token: &str) -> Option<&UserProfile> {
        self.profile = None;
        self.auth_changes.borrow_and_update();
        match self.api.fetch_profile(token).await {
            Ok(profile) => self.profile = Some(profile),
            Err(e) => {
                tracing::debug!(error = %e, "profile fetch failed");
                self.notifier.error(PROFILE_FAILED_MESSAGE);
            }
        }
        self.profile.as_ref()
    }

    /// Token plus a freshly fetched profile, or the notice explaining why
    /// the action cannot proceed.
    async fn session(&mut self) -> Option<(String, UserProfile)> {
        let token = match self.token() {
            Ok(token) => token,
            Err(e) => {
                self.relogin(&e);
                return None;
            }
        };
        let profile = self.fetch_profile(&token).await.cloned()?;
        Some((token, profile))
    }

    /// Change the account email, then refresh the profile.
    pub async fn update_email(&mut self, email: &str) -> FormOutcome {
        let Some((token, profile)) = self.session().await else {
            return FormOutcome::Notified;
        };
        if profile.username == DEMO_USERNAME {
            self.notifier.error(DEMO_EMAIL_MESSAGE);
            return FormOutcome::Notified;
        }
        if profile.email.as_deref() == Some(email) {
            return FormOutcome::FieldError(SAME_EMAIL_MESSAGE.to_owned());
        }

        let update = EmailUpdate { email: email.to_owned() };
        match self.api.update_email(&token, &update).await {
            Ok(()) => {
                self.notifier.success(EMAIL_UPDATED_MESSAGE);
                self.fetch_profile(&token).await;
                FormOutcome::Saved
            }
            Err(e) => FormOutcome::FieldError(e.server_message().unwrap_or(EMAIL_FAILED_MESSAGE).to_owned()),
        }
    }

    /// Change the password. A rotated token from the server replaces the
    /// stored one; the auth flag is unaffected either way.
    pub async fn update_password(&mut self, new_password: &str, confirm_password: &str) -> FormOutcome {
        if !passwords_match(new_password, confirm_password) {
            return FormOutcome::FieldError(PASSWORD_MISMATCH_MESSAGE.to_owned());
        }
        let Some((token, profile)) = self.session().await else {
            return FormOutcome::Notified;
        };
        if profile.username == DEMO_USERNAME {
            self.notifier.error(DEMO_EMAIL_MESSAGE);
            return FormOutcome::Notified;
        }

        let update = PasswordUpdate { user_name: profile.username, password: new_password.to_owned() };
        match self.api.update_password(&token, &update).await {
            Ok(rotated) => {
                if let Some(rotated) = rotated {
                    if let Err(e) = self.auth.credentials().set(&rotated) {
                        tracing::warn!(error = %e, "failed to persist rotated session token");
                        self.notifier.error(TOKEN_SAVE_FAILED_MESSAGE);
                        return FormOutcome::Notified;
                    }
                }
                self.notifier.warning(PASSWORD_UPDATED_MESSAGE);
                FormOutcome::Saved
            }
            Err(e) => FormOutcome::FieldError(e.server_message().unwrap_or(PASSWORD_FAILED_MESSAGE).to_owned()),
        }
    }

    /// Delete the account and end the session. Returns the view to navigate
    /// to on success.
    pub async fn delete_account(&mut self) -> Option<View> {
        let (token, profile) = self.session().await?;
        if profile.username == DEMO_USERNAME {
            self.notifier.error(DEMO_DELETE_MESSAGE);
            return None;
        }

        match self.api.delete_account(&token).await {
            Ok(()) => {
                self.auth.logout();
                self.profile = None;
                self.notifier.success(ACCOUNT_DELETED_MESSAGE);
                Some(View::Landing)
            }
            Err(e) => {
                tracing::debug!(error = %e, "account deletion failed");
                self.notifier.error(DELETE_FAILED_MESSAGE);
                None
            }
        }
    }

    fn relogin(&self, error: &ApiError) {
        tracing::debug!(error = %error, "settings action without usable token");
        self.notifier.error(RELOGIN_MESSAGE);
    }
}
