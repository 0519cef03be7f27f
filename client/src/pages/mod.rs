//! Page controllers for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns the orchestration for one view: it calls the API, reports
//! the outcome through the `Notifier`, and tells the caller which view to
//! show next. Pages never return remote failures to the caller; the
//! notifier is the only failure channel besides inline field errors.

pub mod dashboard;
pub mod landing;
pub mod login;
pub mod navbar;
pub mod settings;
pub mod signup;

use crate::net::api::ApiError;
use crate::state::notify::Notifier;

/// Shown when a protected call finds no stored token.
pub const NO_TOKEN_MESSAGE: &str = "Unauthorized: No token found.";

/// Outcome of submitting a form that can carry an inline field error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormOutcome {
    /// The change was applied.
    Saved,
    /// The change was refused or failed and a notice was shown.
    Notified,
    /// The change was not applied; the message belongs next to the field.
    FieldError(String),
}

/// Report a failed call: missing tokens get the unauthorized notice,
/// everything else gets `fallback`.
pub(crate) fn report_failure(notifier: &Notifier, error: &ApiError, fallback: &str) {
    tracing::debug!(error = %error, "page request failed");
    if matches!(error, ApiError::MissingToken) {
        notifier.error(NO_TOKEN_MESSAGE);
    } else {
        notifier.error(fallback);
    }
}

#[cfg(test)]
pub(crate) mod test_support;
