//! Login page: exchanges credentials for a session token.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use crate::net::api::ApiClient;
use crate::net::types::Credentials;
use crate::router::View;
use crate::state::auth::AuthProvider;
use crate::state::notify::Notifier;

pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful!";
pub const LOGIN_FAILED_MESSAGE: &str = "Invalid credentials. Please try again.";
pub const MISSING_CREDENTIALS_MESSAGE: &str = "Enter both username and password.";

/// Require both fields. The username is sent exactly as typed.
pub(crate) fn validate_credentials(user_name: &str, password: &str) -> Result<Credentials, &'static str> {
    if user_name.is_empty() || password.is_empty() {
        return Err(MISSING_CREDENTIALS_MESSAGE);
    }
    Ok(Credentials { user_name: user_name.to_owned(), password: password.to_owned() })
}

#[derive(Clone, Debug)]
pub struct LoginPage {
    api: ApiClient,
    auth: AuthProvider,
    notifier: Notifier,
}

impl LoginPage {
    #[must_use]
    pub fn new(api: ApiClient, auth: AuthProvider, notifier: Notifier) -> Self {
        Self { api, auth, notifier }
    }

    /// Submit the login form. Returns the view to navigate to on success.
    ///
    /// The token is persisted before the auth flag flips, so the flag never
    /// claims a session the store does not hold.
    pub async fn submit(&self, user_name: &str, password: &str) -> Option<View> {
        let credentials = match validate_credentials(user_name, password) {
            Ok(credentials) => credentials,
            Err(message) => {
                self.notifier.error(message);
                return None;
            }
        };

        let token = match self.api.login(&credentials).await {
            Ok(token) => token,
            Err(e) => {
                tracing::debug!(error = %e, "login failed");
                self.notifier.error(LOGIN_FAILED_MESSAGE);
                return None;
            }
        };

        if let Err(e) = self.auth.credentials().set(&token) {
            tracing::warn!(error = %e, "failed to persist session token");
            self.notifier.error(LOGIN_FAILED_MESSAGE);
            return None;
        }
        self.auth.login();
        self.notifier.success(LOGIN_SUCCESS_MESSAGE);
        Some(View::Dashboard)
    }
}
