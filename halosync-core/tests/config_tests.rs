//! Site config error-message, atomic-write-safety, and selection tests.
//! Storage: ~/.halosync/sites.yaml

use halosync_core::{
    config::{self, Config, Site, SiteAuth},
    types::SiteName,
    ConfigError,
};
use std::fs;

fn token_site(name: &str, url: &str) -> Site {
    Site {
        name: SiteName::from(name),
        url: url.to_string(),
        auth: SiteAuth::Token {
            token: "pat_abc".to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// 1. Load error messages
// ---------------------------------------------------------------------------

#[test]
fn load_corrupt_yaml_returns_parse_error_with_path() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let dir = home.path().join(".halosync");
    fs::create_dir_all(&dir).expect("mkdir");
    fs::write(dir.join("sites.yaml"), b": : corrupt : yaml : !!!\n  - broken: [unclosed")
        .expect("write");

    let err = config::load_at(home.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains("sites.yaml"), "must contain file path, got: {err}");
}

#[test]
fn load_wrong_type_yaml_returns_parse_error() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let dir = home.path().join(".halosync");
    fs::create_dir_all(&dir).expect("mkdir");
    fs::write(dir.join("sites.yaml"), b"- this is a list, not a mapping\n").expect("write");

    let err = config::load_at(home.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
}

// ---------------------------------------------------------------------------
// 2. Persistence
// ---------------------------------------------------------------------------

#[test]
fn basic_auth_site_is_read_back() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let dir = home.path().join(".halosync");
    fs::create_dir_all(&dir).expect("mkdir");
    fs::write(
        dir.join("sites.yaml"),
        "version: 1\nsites:\n  - name: old\n    url: https://old.example\n    auth:\n      username: admin\n      password: secret\n",
    )
    .expect("write");

    let config = config::load_at(home.path()).expect("load");
    let site = config.select(None).expect("single site");
    assert_eq!(
        site.auth,
        SiteAuth::Basic {
            username: "admin".to_string(),
            password: "secret".to_string(),
        }
    );
}

#[test]
fn add_then_load_keeps_every_site() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    config::add_site_at(home.path(), token_site("a", "https://a.example")).expect("add a");
    config::add_site_at(home.path(), token_site("b", "https://b.example/")).expect("add b");

    let loaded = config::load_at(home.path()).expect("load");
    let names: Vec<_> = loaded.sites.iter().map(|s| s.name.0.as_str()).collect();
    assert_eq!(names, ["a", "b"]);
    assert_eq!(loaded.find("b").expect("b").url, "https://b.example");
}

// ---------------------------------------------------------------------------
// 3. Selection
// ---------------------------------------------------------------------------

#[test]
fn select_prefers_explicit_name_then_default() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    config::add_site_at(home.path(), token_site("a", "https://a.example")).expect("add a");
    config::add_site_at(home.path(), token_site("b", "https://b.example")).expect("add b");

    let loaded = config::load_at(home.path()).expect("load");
    assert_eq!(loaded.select(None).expect("default").name.0, "a");
    assert_eq!(loaded.select(Some("b")).expect("named").name.0, "b");

    let updated = config::set_default_at(home.path(), "b").expect("set default");
    assert_eq!(updated.select(None).expect("default").name.0, "b");
}

#[test]
fn select_without_default_among_many_is_an_error() {
    let config = Config {
        default: None,
        sites: vec![
            token_site("a", "https://a.example"),
            token_site("b", "https://b.example"),
        ],
        ..Config::default()
    };
    assert!(matches!(config.select(None), Err(ConfigError::NoDefaultSite)));
    assert!(matches!(
        config.select(Some("c")),
        Err(ConfigError::UnknownSite { .. })
    ));
}

#[test]
fn select_from_empty_config_asks_for_a_site() {
    let err = Config::default().select(None).unwrap_err();
    assert!(matches!(err, ConfigError::NoSites));
    assert!(err.to_string().contains("site add"));
}

#[test]
fn unknown_default_is_reported() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let err = config::set_default_at(home.path(), "ghost").unwrap_err();
    assert!(matches!(err, ConfigError::UnknownSite { .. }), "got: {err}");
}
