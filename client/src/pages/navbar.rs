//! Navigation bar: links that depend on the session, plus logout.

#[cfg(test)]
#[path = "navbar_test.rs"]
mod navbar_test;

use crate::router::{PUBLIC_LANDING, View};
use crate::state::auth::AuthProvider;
use crate::state::notify::Notifier;

pub const LOGGED_OUT_MESSAGE: &str = "Logged out successfully!";

#[derive(Clone, Debug)]
pub struct NavBar {
    auth: AuthProvider,
    notifier: Notifier,
}

impl NavBar {
    #[must_use]
    pub fn new(auth: AuthProvider, notifier: Notifier) -> Self {
        Self { auth, notifier }
    }

    /// Links for the current auth flag. Logout is offered separately
    /// whenever [`NavBar::can_logout`] holds.
    #[must_use]
    pub fn links(&self) -> Vec<View> {
        if self.auth.is_authenticated() { vec![View::Dashboard, View::Settings] } else { vec![View::Login, View::Signup] }
    }

    #[must_use]
    pub fn can_logout(&self) -> bool {
        self.auth.is_authenticated()
    }

    /// End the session and return the view to navigate to.
    pub fn logout(&self) -> View {
        self.auth.logout();
        self.notifier.warning(LOGGED_OUT_MESSAGE);
        PUBLIC_LANDING
    }
}
