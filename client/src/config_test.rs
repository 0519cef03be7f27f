use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn from_lookup_defaults() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[("HOME", "/home/alice")])).unwrap();
    assert_eq!(cfg.api_url, DEFAULT_API_URL);
    assert_eq!(cfg.storage_dir, PathBuf::from("/home/alice/.journalmind"));
    assert_eq!(cfg.timeouts, HttpTimeouts::default());
    assert_eq!(cfg.notice_ttl, Duration::from_millis(3000));
    assert!(!cfg.resync_on_navigate);
}

#[test]
fn from_lookup_parses_overrides() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[
        ("JOURNALMIND_API_URL", "https://journal.example.test/api/"),
        ("JOURNALMIND_STORAGE_DIR", "/var/lib/jm"),
        ("JOURNALMIND_REQUEST_TIMEOUT_SECS", "42"),
        ("JOURNALMIND_CONNECT_TIMEOUT_SECS", "7"),
        ("JOURNALMIND_NOTICE_TTL_MS", "500"),
        ("JOURNALMIND_RESYNC_ON_NAVIGATE", "true"),
    ]))
    .unwrap();
    assert_eq!(cfg.api_url, "https://journal.example.test/api");
    assert_eq!(cfg.storage_dir, PathBuf::from("/var/lib/jm"));
    assert_eq!(cfg.timeouts, HttpTimeouts { request_secs: 42, connect_secs: 7 });
    assert_eq!(cfg.notice_ttl, Duration::from_millis(500));
    assert!(cfg.resync_on_navigate);
}

#[test]
fn from_lookup_blank_api_url_uses_default() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[("HOME", "/h"), ("JOURNALMIND_API_URL", "  ")])).unwrap();
    assert_eq!(cfg.api_url, DEFAULT_API_URL);
}

#[test]
fn from_lookup_bad_timeout_errors() {
    let err = ClientConfig::from_lookup(lookup_from(&[("HOME", "/h"), ("JOURNALMIND_REQUEST_TIMEOUT_SECS", "soon")]))
        .unwrap_err()
        .to_string();
    assert!(err.contains("JOURNALMIND_REQUEST_TIMEOUT_SECS"));
}

#[test]
fn from_lookup_bad_bool_errors() {
    let err = ClientConfig::from_lookup(lookup_from(&[("HOME", "/h"), ("JOURNALMIND_RESYNC_ON_NAVIGATE", "maybe")]))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Parse { var: "JOURNALMIND_RESYNC_ON_NAVIGATE", .. }));
}

#[test]
fn from_lookup_bool_variants() {
    for (raw, expected) in [("1", true), ("YES", true), ("off", false), ("0", false)] {
        let cfg =
            ClientConfig::from_lookup(lookup_from(&[("HOME", "/h"), ("JOURNALMIND_RESYNC_ON_NAVIGATE", raw)])).unwrap();
        assert_eq!(cfg.resync_on_navigate, expected, "raw value {raw}");
    }
}

#[test]
fn from_lookup_without_home_or_storage_dir_errors() {
    let err = ClientConfig::from_lookup(lookup_from(&[])).unwrap_err();
    assert!(matches!(err, ConfigError::MissingStorageDir));
}
