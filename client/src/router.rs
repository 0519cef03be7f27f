//! View routing and the protected-view guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every navigation passes through [`guard`]. Protected views render only
//! while the auth flag is set; otherwise the visitor lands on the public
//! landing view. Decisions are never cached between navigations.
//!
//! The [`Router`] also subscribes to the auth flag so a logout triggered
//! anywhere in the app moves it off a protected view on its next refresh.

#[cfg(test)]
#[path = "router_test.rs"]
mod router_test;

use std::fmt;

use tokio::sync::watch;

use crate::state::auth::AuthProvider;

/// Every routable view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum View {
    Landing,
    Login,
    Signup,
    Dashboard,
    Settings,
}

/// Where refused navigations end up.
pub const PUBLIC_LANDING: View = View::Landing;

impl View {
    pub const ALL: [View; 5] = [View::Landing, View::Login, View::Signup, View::Dashboard, View::Settings];

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Landing => "/landingpage",
            Self::Login => "/login",
            Self::Signup => "/signup",
            Self::Dashboard => "/",
            Self::Settings => "/settings",
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Landing => "Welcome",
            Self::Login => "Login",
            Self::Signup => "Sign Up",
            Self::Dashboard => "Dashboard",
            Self::Settings => "Settings",
        }
    }

    /// Views that require an authenticated session.
    #[must_use]
    pub fn is_protected(self) -> bool {
        matches!(self, Self::Dashboard | Self::Settings)
    }

    /// Resolve a request path. Query strings, fragments and a trailing slash
    /// are ignored.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        Self::ALL.into_iter().find(|view| view.path() == normalized)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of guarding one navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Render(View),
    Redirect(View),
}

/// Decide whether `view` may render for the given auth flag.
#[must_use]
pub fn guard(view: View, authenticated: bool) -> GuardDecision {
    if view.is_protected() && !authenticated {
        GuardDecision::Redirect(PUBLIC_LANDING)
    } else {
        GuardDecision::Render(view)
    }
}

/// Result of a router navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    Render(View),
    Redirect { from: View, to: View },
    NotFound(String),
}

impl Navigation {
    /// The view left showing after this navigation, if any.
    #[must_use]
    pub fn rendered(&self) -> Option<View> {
        match self {
            Self::Render(view) => Some(*view),
            Self::Redirect { to, .. } => Some(*to),
            Self::NotFound(_) => None,
        }
    }
}

/// Tracks the current view and applies the guard on every navigation.
#[derive(Debug)]
pub struct Router {
    auth: AuthProvider,
    auth_changes: watch::Receiver<bool>,
    current: View,
    resync_on_navigate: bool,
}

impl Router {
    /// Router starting on the landing view.
    ///
    /// With `resync_on_navigate`, the auth flag is re-read from the credential
    /// store before each guard evaluation instead of trusting the cached value.
    #[must_use]
    pub fn new(auth: AuthProvider, resync_on_navigate: bool) -> Self {
        let auth_changes = auth.subscribe();
        Self { auth, auth_changes, current: PUBLIC_LANDING, resync_on_navigate }
    }

    #[must_use]
    pub fn current(&self) -> View {
        self.current
    }

    /// Navigate to a request path; unknown paths leave the current view as is.
    pub fn navigate(&mut self, path: &str) -> Navigation {
        match View::from_path(path) {
            Some(view) => self.navigate_to(view),
            None => {
                tracing::debug!(path, "no route matches path");
                Navigation::NotFound(path.to_owned())
            }
        }
    }

    /// Navigate to `view`, evaluating the guard against the current flag.
    pub fn navigate_to(&mut self, view: View) -> Navigation {
        let authenticated = self.authenticated_now();
        // The decision below already reflects this value.
        self.auth_changes.borrow_and_update();

        let navigation = match guard(view, authenticated) {
            GuardDecision::Render(view) => Navigation::Render(view),
            GuardDecision::Redirect(to) => {
                tracing::debug!(from = %view, to = %to, "guard redirected navigation");
                Navigation::Redirect { from: view, to }
            }
        };
        if let Some(view) = navigation.rendered() {
            self.current = view;
        }
        navigation
    }

    /// Re-evaluate the current view if the auth flag changed since the last
    /// navigation. Returns the navigation performed, if any.
    pub fn refresh(&mut self) -> Option<Navigation> {
        if self.resync_on_navigate {
            self.auth.resync();
        }
        if !self.auth_changes.has_changed().unwrap_or(false) {
            return None;
        }
        let current = self.current;
        match self.navigate_to(current) {
            Navigation::Render(view) if view == current => None,
            navigation => Some(navigation),
        }
    }

    fn authenticated_now(&self) -> bool {
        if self.resync_on_navigate { self.auth.resync() } else { self.auth.is_authenticated() }
    }
}
