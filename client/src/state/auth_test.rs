use super::*;
use crate::state::credentials::{CredentialStore, MemoryCredentialStore, StoreError};

fn provider_over(store: &MemoryCredentialStore) -> AuthProvider {
    AuthProvider::initialize(Arc::new(store.clone()))
}

/// Store whose reads and writes always fail.
struct BrokenStore;

impl CredentialStore for BrokenStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        Err(StoreError::Corrupt { path: "broken".into(), message: "unreadable".to_owned() })
    }

    fn set(&self, _token: &str) -> Result<(), StoreError> {
        Err(StoreError::Corrupt { path: "broken".into(), message: "unwritable".to_owned() })
    }

    fn clear(&self) -> Result<(), StoreError> {
        Err(StoreError::Corrupt { path: "broken".into(), message: "unwritable".to_owned() })
    }
}

// =============================================================
// initialize
// =============================================================

#[test]
fn initialize_without_token_is_anonymous() {
    let auth = provider_over(&MemoryCredentialStore::new());
    assert!(!auth.is_authenticated());
    assert_eq!(auth.status(), AuthStatus::Anonymous);
}

#[test]
fn initialize_with_token_is_authenticated() {
    let auth = provider_over(&MemoryCredentialStore::with_token("tok123"));
    assert!(auth.is_authenticated());
    assert_eq!(auth.status(), AuthStatus::Authenticated);
}

#[test]
fn initialize_with_unreadable_store_is_anonymous() {
    let auth = AuthProvider::initialize(Arc::new(BrokenStore));
    assert!(!auth.is_authenticated());
}

// =============================================================
// login / logout
// =============================================================

#[test]
fn login_sets_flag_regardless_of_prior_state() {
    let store = MemoryCredentialStore::new();
    let auth = provider_over(&store);
    store.set("tok123").unwrap();

    auth.login();
    assert!(auth.is_authenticated());
    auth.login();
    assert!(auth.is_authenticated());
}

#[test]
fn login_does_not_write_the_store() {
    let store = MemoryCredentialStore::new();
    let auth = provider_over(&store);
    auth.login();
    assert_eq!(store.get().unwrap(), None);
}

#[test]
fn logout_clears_flag_and_store() {
    let store = MemoryCredentialStore::with_token("tok123");
    let auth = provider_over(&store);

    auth.logout();
    assert!(!auth.is_authenticated());
    assert_eq!(store.get().unwrap(), None);
}

#[test]
fn logout_twice_matches_logout_once() {
    let store = MemoryCredentialStore::with_token("tok123");
    let auth = provider_over(&store);

    auth.logout();
    auth.logout();
    assert!(!auth.is_authenticated());
    assert_eq!(store.get().unwrap(), None);
}

#[test]
fn logout_with_failing_store_still_clears_flag() {
    let auth = AuthProvider::initialize(Arc::new(BrokenStore));
    auth.login();
    auth.logout();
    assert!(!auth.is_authenticated());
}

#[test]
fn clones_share_flag() {
    let store = MemoryCredentialStore::with_token("tok123");
    let auth = provider_over(&store);
    let navbar_handle = auth.clone();

    navbar_handle.logout();
    assert!(!auth.is_authenticated());
}

// =============================================================
// subscribe
// =============================================================

#[test]
fn subscribers_observe_transitions() {
    let store = MemoryCredentialStore::new();
    let auth = provider_over(&store);
    let mut rx = auth.subscribe();
    assert!(!rx.has_changed().unwrap());

    store.set("tok123").unwrap();
    auth.login();
    assert!(rx.has_changed().unwrap());
    assert!(*rx.borrow_and_update());

    auth.logout();
    assert!(rx.has_changed().unwrap());
    assert!(!*rx.borrow_and_update());
}

#[test]
fn repeated_logout_does_not_renotify() {
    let auth = provider_over(&MemoryCredentialStore::with_token("tok123"));
    let mut rx = auth.subscribe();

    auth.logout();
    rx.borrow_and_update();
    auth.logout();
    assert!(!rx.has_changed().unwrap());
}

#[tokio::test]
async fn subscriber_wakes_on_change() {
    let auth = provider_over(&MemoryCredentialStore::with_token("tok123"));
    let mut rx = auth.subscribe();

    let waiter = tokio::spawn(async move {
        rx.changed().await.unwrap();
        *rx.borrow()
    });
    auth.logout();
    assert!(!waiter.await.unwrap());
}

// =============================================================
// staleness across tabs
// =============================================================

#[test]
fn other_tab_logout_leaves_flag_stale() {
    let shared = MemoryCredentialStore::with_token("tok123");
    let tab_a = provider_over(&shared);
    let tab_b = provider_over(&shared);

    tab_a.logout();

    assert!(!tab_a.is_authenticated());
    assert_eq!(shared.get().unwrap(), None);
    // Tab B keeps its cached flag until it re-initializes.
    assert!(tab_b.is_authenticated());

    let tab_b_reloaded = provider_over(&shared);
    assert!(!tab_b_reloaded.is_authenticated());
}

#[test]
fn manual_store_clear_leaves_flag_stale() {
    let store = MemoryCredentialStore::with_token("tok123");
    let auth = provider_over(&store);
    store.clear().unwrap();
    assert!(auth.is_authenticated());
}

#[test]
fn resync_picks_up_external_clear() {
    let shared = MemoryCredentialStore::with_token("tok123");
    let tab_a = provider_over(&shared);
    let tab_b = provider_over(&shared);
    let mut rx = tab_b.subscribe();

    tab_a.logout();
    assert!(!tab_b.resync());
    assert!(!tab_b.is_authenticated());
    assert!(rx.has_changed().unwrap());
}

#[test]
fn resync_without_change_does_not_notify() {
    let auth = provider_over(&MemoryCredentialStore::with_token("tok123"));
    let rx = auth.subscribe();
    assert!(auth.resync());
    assert!(!rx.has_changed().unwrap());
}

#[test]
fn auth_status_from_bool() {
    assert_eq!(AuthStatus::from(true), AuthStatus::Authenticated);
    assert_eq!(AuthStatus::from(false), AuthStatus::Anonymous);
    assert_eq!(AuthStatus::default(), AuthStatus::Anonymous);
}
