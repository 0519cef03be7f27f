//! Application root: owns the session state and wires the collaborators.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `App` is one application lifetime. It initializes the
//! [`AuthProvider`] exactly once from the credential store and hands clones
//! of it, the [`ApiClient`] and the [`Notifier`] to every page it builds.
//! Nothing in the crate reaches for a global.
//!
//! TRADE-OFFS
//! ==========
//! Pages are cheap handle bundles and are built on demand. The settings page
//! is the exception: it caches the loaded profile, so the app keeps one.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::net::api::{ApiClient, ApiError};
use crate::pages::dashboard::DashboardPage;
use crate::pages::login::LoginPage;
use crate::pages::navbar::NavBar;
use crate::pages::settings::SettingsPage;
use crate::pages::signup::SignupPage;
use crate::router::{Navigation, Router, View};
use crate::state::auth::{AuthProvider, AuthStatus};
use crate::state::credentials::{CredentialStore, FileCredentialStore};
use crate::state::notify::{Notice, Notifier};

#[derive(Debug)]
pub struct App {
    auth: AuthProvider,
    api: ApiClient,
    notifier: Notifier,
    router: Router,
    settings: SettingsPage,
}

impl App {
    /// Wire an app over the given store and API client.
    pub fn new(store: Arc<dyn CredentialStore>, api: ApiClient, notifier: Notifier, resync_on_navigate: bool) -> Self {
        let auth = AuthProvider::initialize(store);
        let router = Router::new(auth.clone(), resync_on_navigate);
        let settings = SettingsPage::new(api.clone(), auth.clone(), notifier.clone());
        Self { auth, api, notifier, router, settings }
    }

    /// Build an app from config, with the token persisted per API origin
    /// under the configured storage directory.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] when the HTTP client cannot be
    /// constructed.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let store = FileCredentialStore::for_origin(&config.storage_dir, &config.api_url);
        tracing::debug!(path = %store.path().display(), "using credential store");
        let api = ApiClient::new(&config.api_url, config.timeouts)?;
        Ok(Self::new(Arc::new(store), api, Notifier::new(config.notice_ttl), config.resync_on_navigate))
    }

    // =========================================================================
    // SESSION
    // =========================================================================

    #[must_use]
    pub fn auth(&self) -> &AuthProvider {
        &self.auth
    }

    #[must_use]
    pub fn status(&self) -> AuthStatus {
        self.auth.status()
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Remove and return the visible notice, if it has not expired.
    pub fn take_notice(&self) -> Option<Notice> {
        self.notifier.take()
    }

    /// `GET` the health endpoint and return its body.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of the failed request.
    pub async fn health_check(&self) -> Result<String, ApiError> {
        self.api.health_check().await
    }

    // =========================================================================
    // NAVIGATION
    // =========================================================================

    #[must_use]
    pub fn current_view(&self) -> View {
        self.router.current()
    }

    /// Navigate to a request path through the guard.
    pub fn navigate(&mut self, path: &str) -> Navigation {
        self.router.navigate(path)
    }

    /// Navigate to `view` through the guard.
    pub fn open(&mut self, view: View) -> Navigation {
        self.router.navigate_to(view)
    }

    /// Follow a page's "go here next" result, then pick up any auth change.
    pub fn follow(&mut self, next: Option<View>) -> Option<Navigation> {
        match next {
            Some(view) => Some(self.router.navigate_to(view)),
            None => self.router.refresh(),
        }
    }

    /// Log out through the navigation bar and move to the landing view.
    pub fn logout(&mut self) -> Navigation {
        let next = self.navbar().logout();
        self.router.navigate_to(next)
    }

    // =========================================================================
    // PAGES
    // =========================================================================

    #[must_use]
    pub fn navbar(&self) -> NavBar {
        NavBar::new(self.auth.clone(), self.notifier.clone())
    }

    #[must_use]
    pub fn login_page(&self) -> LoginPage {
        LoginPage::new(self.api.clone(), self.auth.clone(), self.notifier.clone())
    }

    #[must_use]
    pub fn signup_page(&self) -> SignupPage {
        SignupPage::new(self.api.clone(), self.notifier.clone())
    }

    #[must_use]
    pub fn dashboard_page(&self) -> DashboardPage {
        DashboardPage::new(self.api.clone(), self.auth.credentials(), self.notifier.clone())
    }

    pub fn settings_page(&mut self) -> &mut SettingsPage {
        &mut self.settings
    }
}
