use std::path::PathBuf;
use std::time::Duration;

use super::*;
use crate::config::HttpTimeouts;
use crate::pages::FormOutcome;
use crate::state::credentials::{CredentialStore as _, MemoryCredentialStore};
use crate::state::notify::NoticeKind;

fn app_over(server: &mockito::Server, store: &MemoryCredentialStore) -> App {
    let api = ApiClient::new(&server.url(), HttpTimeouts::default()).unwrap();
    App::new(Arc::new(store.clone()), api, Notifier::default(), false)
}

fn config_for(url: &str, dir: PathBuf) -> ClientConfig {
    ClientConfig {
        api_url: url.to_owned(),
        storage_dir: dir,
        timeouts: HttpTimeouts::default(),
        notice_ttl: Duration::from_secs(3),
        resync_on_navigate: false,
    }
}

#[tokio::test]
async fn starts_on_landing_and_guards_protected_views() {
    let server = mockito::Server::new_async().await;
    let mut app = app_over(&server, &MemoryCredentialStore::new());

    assert_eq!(app.current_view(), View::Landing);
    assert_eq!(app.status(), AuthStatus::Anonymous);
    assert_eq!(app.navigate("/settings"), Navigation::Redirect { from: View::Settings, to: View::Landing });
    assert_eq!(app.navigate("/nowhere"), Navigation::NotFound("/nowhere".to_owned()));
    assert_eq!(app.current_view(), View::Landing);
}

#[tokio::test]
async fn login_then_protected_view_renders() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server.mock("POST", "/public/login").with_status(200).with_body("tok123").create_async().await;
    let store = MemoryCredentialStore::new();
    let mut app = app_over(&server, &store);

    let next = app.login_page().submit("alice", "pw1").await;
    assert_eq!(app.follow(next), Some(Navigation::Render(View::Dashboard)));
    assert_eq!(app.status(), AuthStatus::Authenticated);
    assert_eq!(app.open(View::Settings), Navigation::Render(View::Settings));

    let notice = app.take_notice().unwrap();
    assert_eq!((notice.kind, notice.message.as_str()), (NoticeKind::Success, "Login successful!"));
    assert_eq!(app.take_notice(), None);
}

#[tokio::test]
async fn logout_moves_to_landing() {
    let server = mockito::Server::new_async().await;
    let store = MemoryCredentialStore::with_token("tok");
    let mut app = app_over(&server, &store);
    app.open(View::Dashboard);

    assert_eq!(app.logout(), Navigation::Render(View::Landing));
    assert_eq!(app.status(), AuthStatus::Anonymous);
    assert_eq!(store.get().unwrap(), None);
    assert_eq!(app.open(View::Dashboard), Navigation::Redirect { from: View::Dashboard, to: View::Landing });
}

#[tokio::test]
async fn account_deletion_ends_session() {
    let mut server = mockito::Server::new_async().await;
    let _profile = server.mock("GET", "/user").with_status(200).with_body(r#"{"username":"alice"}"#).create_async().await;
    let _mock = server.mock("DELETE", "/user").with_status(204).create_async().await;
    let mut app = app_over(&server, &MemoryCredentialStore::with_token("tok"));
    assert_eq!(app.open(View::Settings), Navigation::Render(View::Settings));

    let next = app.settings_page().delete_account().await;
    assert_eq!(app.follow(next), Some(Navigation::Render(View::Landing)));
    assert_eq!(app.open(View::Settings), Navigation::Redirect { from: View::Settings, to: View::Landing });
}

#[tokio::test]
async fn settings_follow_the_user_signed_in_now() {
    let mut server = mockito::Server::new_async().await;
    let _alice = server
        .mock("GET", "/user")
        .match_header("authorization", "Bearer tok_alice")
        .with_status(200)
        .with_body(r#"{"username":"alice","email":"a@x.io"}"#)
        .create_async()
        .await;
    let _bob = server
        .mock("GET", "/user")
        .match_header("authorization", "Bearer tok_bob")
        .with_status(200)
        .with_body(r#"{"username":"bob","email":"b@x.io"}"#)
        .create_async()
        .await;
    let _login = server.mock("POST", "/public/login").with_status(200).with_body("tok_bob").create_async().await;
    let update = server
        .mock("PUT", "/user")
        .match_header("authorization", "Bearer tok_bob")
        .match_body(mockito::Matcher::Json(serde_json::json!({"userName": "bob", "password": "newpass1"})))
        .with_status(204)
        .create_async()
        .await;
    let mut app = app_over(&server, &MemoryCredentialStore::with_token("tok_alice"));
    app.open(View::Settings);
    assert_eq!(app.settings_page().load_profile().await.map(|p| p.username.clone()).as_deref(), Some("alice"));

    app.logout();
    assert_eq!(app.settings_page().profile(), None);
    let next = app.login_page().submit("bob", "pw1").await;
    app.follow(next);
    assert_eq!(app.open(View::Settings), Navigation::Render(View::Settings));

    assert_eq!(app.settings_page().update_password("newpass1", "newpass1").await, FormOutcome::Saved);
    update.assert_async().await;
    assert_eq!(app.settings_page().profile().map(|p| p.username.as_str()), Some("bob"));
}

#[tokio::test]
async fn failed_page_action_keeps_current_view() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server.mock("POST", "/public/login").with_status(401).create_async().await;
    let mut app = app_over(&server, &MemoryCredentialStore::new());
    app.open(View::Login);

    let next = app.login_page().submit("alice", "wrong").await;
    assert_eq!(app.follow(next), None);
    assert_eq!(app.current_view(), View::Login);
}

#[tokio::test]
async fn health_check_returns_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server.mock("GET", "/public/health-check").with_status(200).with_body("Ok").create_async().await;
    let app = app_over(&server, &MemoryCredentialStore::new());

    assert_eq!(app.health_check().await.unwrap(), "Ok");
}

#[tokio::test]
async fn file_backed_session_survives_restart() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server.mock("POST", "/public/login").with_status(200).with_body("tok123").create_async().await;
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&server.url(), dir.path().to_path_buf());

    let first = App::from_config(&config).unwrap();
    first.login_page().submit("alice", "pw1").await;
    assert_eq!(first.status(), AuthStatus::Authenticated);

    let mut second = App::from_config(&config).unwrap();
    assert_eq!(second.status(), AuthStatus::Authenticated);
    assert_eq!(second.open(View::Dashboard), Navigation::Render(View::Dashboard));
}

#[tokio::test]
async fn sessions_are_scoped_per_api_origin() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileCredentialStore::for_origin(dir.path(), "http://localhost:8080");
    store.set("tok").unwrap();

    let other = App::from_config(&config_for("http://localhost:9090", dir.path().to_path_buf())).unwrap();
    assert_eq!(other.status(), AuthStatus::Anonymous);
    let same = App::from_config(&config_for("http://localhost:8080", dir.path().to_path_buf())).unwrap();
    assert_eq!(same.status(), AuthStatus::Authenticated);
}
