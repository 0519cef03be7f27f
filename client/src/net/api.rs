//! REST API client for the journal service.
//!
//! ERROR HANDLING
//! ==============
//! Every call returns [`ApiError`]. Pages turn these into notices; nothing in
//! this module retries, and nothing here touches the auth flag.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::types::{
    Credentials, EmailUpdate, EntryDraft, ErrorBody, JournalEntry, NewUser, PasswordUpdate, UserProfile,
    UsernameAvailability,
};
use crate::config::HttpTimeouts;
use crate::state::credentials::{CredentialStore, StoreError};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A protected call was attempted with no stored token.
    #[error("unauthorized: no token found")]
    MissingToken,

    /// The server answered with a non-success status.
    #[error("request rejected with status {status}{}", message_suffix(.message.as_deref()))]
    Rejected { status: u16, message: Option<String> },

    /// The request never produced a response (connect, timeout, IO).
    #[error("request failed: {0}")]
    Transport(String),

    /// The response body did not have the expected shape.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The base URL cannot carry a path (not absolute, or `data:`-like).
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The stored token could not be read.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl ApiError {
    /// True for a missing token and for 401/403 responses.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::MissingToken | Self::Rejected { status: 401 | 403, .. })
    }

    /// The `message` field of a rejected request's JSON body, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message: Some(message), .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

fn message_suffix(message: Option<&str>) -> String {
    message.map(|m| format!(": {m}")).unwrap_or_default()
}

/// Read the bearer token for a protected call.
///
/// # Errors
///
/// Returns [`ApiError::MissingToken`] when no token is stored, or
/// [`ApiError::Storage`] when the store cannot be read.
pub fn stored_token(store: &dyn CredentialStore) -> Result<String, ApiError> {
    store.get()?.filter(|token| !token.is_empty()).ok_or(ApiError::MissingToken)
}

// =============================================================================
// ENDPOINTS
// =============================================================================

const LOGIN_PATH: &str = "/public/login";
const SIGNUP_PATH: &str = "/public/signup";
const CHECK_USERNAME_PATH: &str = "/public/check-username";
const HEALTH_CHECK_PATH: &str = "/public/health-check";
const JOURNAL_PATH: &str = "/journal";
const USER_PATH: &str = "/user";
const EMAIL_UPDATE_PATH: &str = "/user/emailUpdate";
const GREETING_PATH: &str = "/user/greetings";

// =============================================================================
// CLIENT
// =============================================================================

/// HTTP client bound to one API base URL.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for `base_url`; a trailing `/` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeouts: HttpTimeouts) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ----- public endpoints -----

    /// `GET /public/health-check`, returning the body text.
    pub async fn health_check(&self) -> Result<String, ApiError> {
        self.send(self.request(Method::GET, HEALTH_CHECK_PATH)).await
    }

    /// `POST /public/login`, returning the issued session token verbatim.
    pub async fn login(&self, credentials: &Credentials) -> Result<String, ApiError> {
        let body = self.send(self.request(Method::POST, LOGIN_PATH).json(credentials)).await?;
        parse_token(&body).ok_or_else(|| ApiError::Parse("login response carried no token".to_owned()))
    }

    /// `POST /public/signup`.
    pub async fn signup(&self, user: &NewUser) -> Result<(), ApiError> {
        self.send(self.request(Method::POST, SIGNUP_PATH).json(user)).await.map(drop)
    }

    /// `GET /public/check-username?username=`.
    pub async fn check_username(&self, username: &str) -> Result<bool, ApiError> {
        let request = self.request(Method::GET, CHECK_USERNAME_PATH).query(&[("username", username)]);
        let availability: UsernameAvailability = self.send_json(request).await?;
        Ok(availability.available)
    }

    // ----- journal -----

    /// `GET /journal`.
    pub async fn fetch_entries(&self, token: &str) -> Result<Vec<JournalEntry>, ApiError> {
        let body = self.send(self.authed(Method::GET, JOURNAL_PATH, token)).await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        parse_json(&body)
    }

    /// `POST /journal`.
    pub async fn create_entry(&self, token: &str, draft: &EntryDraft) -> Result<(), ApiError> {
        self.send_body(Method::POST, JOURNAL_PATH, token, draft).await
    }

    /// `PUT /journal/id/{id}`.
    pub async fn update_entry(&self, token: &str, id: &str, draft: &EntryDraft) -> Result<(), ApiError> {
        let url = self.entry_url(id)?;
        self.send(self.http.request(Method::PUT, url).bearer_auth(token).json(draft)).await.map(drop)
    }

    /// `DELETE /journal/id/{id}`.
    pub async fn delete_entry(&self, token: &str, id: &str) -> Result<(), ApiError> {
        let url = self.entry_url(id)?;
        self.send(self.http.request(Method::DELETE, url).bearer_auth(token)).await.map(drop)
    }

    // ----- user -----

    /// `GET /user`.
    pub async fn fetch_profile(&self, token: &str) -> Result<UserProfile, ApiError> {
        self.send_json(self.authed(Method::GET, USER_PATH, token)).await
    }

    /// `PUT /user/emailUpdate`.
    pub async fn update_email(&self, token: &str, update: &EmailUpdate) -> Result<(), ApiError> {
        self.send_body(Method::PUT, EMAIL_UPDATE_PATH, token, update).await
    }

    /// `PUT /user`, returning the rotated token when the server sends one.
    pub async fn update_password(&self, token: &str, update: &PasswordUpdate) -> Result<Option<String>, ApiError> {
        let body = self.send(self.authed(Method::PUT, USER_PATH, token).json(update)).await?;
        Ok(parse_token(&body))
    }

    /// `DELETE /user`.
    pub async fn delete_account(&self, token: &str) -> Result<(), ApiError> {
        self.send(self.authed(Method::DELETE, USER_PATH, token)).await.map(drop)
    }

    /// `GET /user/greetings`, returning the greeting text.
    pub async fn greeting(&self, token: &str) -> Result<String, ApiError> {
        self.send(self.authed(Method::GET, GREETING_PATH, token)).await
    }

    // ----- plumbing -----

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    /// `{base}/journal/id/{id}` with `id` encoded as one path segment.
    fn entry_url(&self, id: &str) -> Result<Url, ApiError> {
        let invalid = || ApiError::InvalidBaseUrl(self.base_url.clone());
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .pop_if_empty()
            .extend([JOURNAL_PATH.trim_start_matches('/'), "id", id]);
        Ok(url)
    }

    fn authed(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        self.request(method, path).bearer_auth(token)
    }

    async fn send_body(&self, method: Method, path: &str, token: &str, body: &impl Serialize) -> Result<(), ApiError> {
        self.send(self.authed(method, path, token).json(body)).await.map(drop)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send(request).await?;
        parse_json(&body)
    }

    async fn send(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        tracing::debug!(url = %response.url().path(), status = status.as_u16(), "api response");

        let text = response.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(ApiError::Rejected { status: status.as_u16(), message: extract_message(&text) });
        }
        Ok(text)
    }
}

fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))
}

/// Token from a plain-text or JSON-string body; `None` when blank.
fn parse_token(body: &str) -> Option<String> {
    let token = match serde_json::from_str::<String>(body) {
        Ok(decoded) => decoded,
        Err(_) => body.trim().to_owned(),
    };
    (!token.is_empty()).then_some(token)
}

fn extract_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body).ok().and_then(|b| b.message)
}
