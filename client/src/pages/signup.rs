//! Signup page: account creation and username availability probing.

#[cfg(test)]
#[path = "signup_test.rs"]
mod signup_test;

use crate::net::api::ApiClient;
use crate::net::types::NewUser;
use crate::router::View;
use crate::state::notify::Notifier;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 5;

pub const USERNAME_TOO_SHORT: &str = "Username must be at least 3 characters";
pub const INVALID_EMAIL: &str = "Please enter a valid email address";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 5 characters";
pub const PASSWORD_NEEDS_DIGIT: &str = "Password must contain at least one number";
pub const SIGNUP_FAILED_MESSAGE: &str = "Signup failed. Please try again.";

/// Raw signup form input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub user_name: String,
    pub email: String,
    pub password: String,
}

/// Per-field validation messages; empty when the form is valid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub user_name: Option<&'static str>,
    pub email: Option<&'static str>,
    pub password: Option<&'static str>,
}

impl FieldErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.user_name.is_none() && self.email.is_none() && self.password.is_none()
    }

    /// Messages in form order.
    #[must_use]
    pub fn messages(&self) -> Vec<&'static str> {
        [self.user_name, self.email, self.password].into_iter().flatten().collect()
    }
}

/// Validate the form, returning the request body when every field passes.
///
/// # Errors
///
/// Returns the per-field messages when any field fails.
pub fn validate_signup(form: &SignupForm) -> Result<NewUser, FieldErrors> {
    let mut errors = FieldErrors::default();
    if form.user_name.chars().count() < MIN_USERNAME_LEN {
        errors.user_name = Some(USERNAME_TOO_SHORT);
    }
    if !is_valid_email(&form.email) {
        errors.email = Some(INVALID_EMAIL);
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        errors.password = Some(PASSWORD_TOO_SHORT);
    } else if !form.password.chars().any(|c| c.is_ascii_digit()) {
        errors.password = Some(PASSWORD_NEEDS_DIGIT);
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(NewUser { user_name: form.user_name.clone(), email: form.email.clone(), password: form.password.clone() })
}

/// `local@domain.tld` shape: no whitespace, exactly one `@`, and a dot in the
/// domain with characters on both sides.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain.char_indices().any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

#[derive(Clone, Debug)]
pub struct SignupPage {
    api: ApiClient,
    notifier: Notifier,
}

impl SignupPage {
    #[must_use]
    pub fn new(api: ApiClient, notifier: Notifier) -> Self {
        Self { api, notifier }
    }

    /// Ask the server whether `user_name` is free.
    ///
    /// Names shorter than the minimum are not checked. Failures are logged and
    /// reported as unknown.
    pub async fn check_username(&self, user_name: &str) -> Option<bool> {
        if user_name.chars().count() < MIN_USERNAME_LEN {
            return None;
        }
        match self.api.check_username(user_name).await {
            Ok(available) => Some(available),
            Err(e) => {
                tracing::warn!(error = %e, "username availability check failed");
                None
            }
        }
    }

    /// Validate and submit the form. Returns the view to navigate to on success.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when validation fails; no request is made.
    pub async fn submit(&self, form: &SignupForm) -> Result<Option<View>, FieldErrors> {
        let user = validate_signup(form)?;
        match self.api.signup(&user).await {
            Ok(()) => {
                self.notifier.success(format!("Account created successfully! {}", user.user_name));
                Ok(Some(View::Login))
            }
            Err(e) => {
                tracing::debug!(error = %e, "signup failed");
                self.notifier.error(e.server_message().unwrap_or(SIGNUP_FAILED_MESSAGE));
                Ok(None)
            }
        }
    }
}
