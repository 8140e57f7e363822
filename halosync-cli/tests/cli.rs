use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn halosync_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("halosync"));
    cmd.env("HOME", home)
        .env("USERPROFILE", home)
        .env_remove("RUST_LOG");
    cmd
}

fn add_site(home: &Path, name: &str, url: &str) {
    halosync_cmd(home)
        .args(["site", "add", name, url, "--token", "pat_secret"])
        .assert()
        .success();
}

#[test]
fn site_add_then_list() {
    let home = TempDir::new().expect("home");

    halosync_cmd(home.path())
        .args(["site", "add", "blog", "https://blog.example/", "--token", "pat_secret"])
        .assert()
        .success()
        .stdout(contains("Added site 'blog'"))
        .stdout(contains("default site"));

    assert!(home.path().join(".halosync").join("sites.yaml").is_file());

    halosync_cmd(home.path())
        .args(["site", "list"])
        .assert()
        .success()
        .stdout(contains("blog"))
        .stdout(contains("https://blog.example"))
        .stdout(contains("pat_secret").not());
}

#[test]
fn site_add_requires_credentials() {
    let home = TempDir::new().expect("home");
    halosync_cmd(home.path())
        .args(["site", "add", "blog", "https://blog.example"])
        .assert()
        .failure()
        .stderr(contains("--token"));
}

#[test]
fn duplicate_site_is_rejected() {
    let home = TempDir::new().expect("home");
    add_site(home.path(), "blog", "https://blog.example");
    halosync_cmd(home.path())
        .args(["site", "add", "blog", "https://other.example", "--token", "t"])
        .assert()
        .failure()
        .stderr(contains("already exists"));
}

#[test]
fn basic_auth_site_can_be_added_and_made_default() {
    let home = TempDir::new().expect("home");
    add_site(home.path(), "first", "https://first.example");
    halosync_cmd(home.path())
        .args([
            "site",
            "add",
            "second",
            "https://second.example",
            "--username",
            "admin",
            "--password",
            "pw",
        ])
        .assert()
        .success();
    halosync_cmd(home.path())
        .args(["site", "default", "second"])
        .assert()
        .success()
        .stdout(contains("'second' is now the default site"));

    let yaml = fs::read_to_string(home.path().join(".halosync/sites.yaml")).expect("config");
    assert!(yaml.contains("default: second"), "{yaml}");
    assert!(yaml.contains("username: admin"), "{yaml}");
}

#[test]
fn publish_without_sites_fails() {
    let home = TempDir::new().expect("home");
    let docs = TempDir::new().expect("docs");
    let file = docs.path().join("post.md");
    fs::write(&file, "body").expect("write");

    halosync_cmd(home.path())
        .arg("publish")
        .arg(&file)
        .assert()
        .failure()
        .stderr(contains("no sites configured"));
}

#[test]
fn publish_of_missing_file_is_a_noop() {
    let home = TempDir::new().expect("home");
    let docs = TempDir::new().expect("docs");
    add_site(home.path(), "blog", "http://127.0.0.1:9");

    halosync_cmd(home.path())
        .arg("publish")
        .arg(docs.path().join("absent.md"))
        .assert()
        .success()
        .stderr(contains("nothing to publish"));
    assert!(!docs.path().join("absent.md").exists());
}

#[test]
fn pull_aborts_on_site_mismatch_before_any_request() {
    let home = TempDir::new().expect("home");
    let docs = TempDir::new().expect("docs");
    add_site(home.path(), "blog", "http://127.0.0.1:9");
    let file = docs.path().join("post.md");
    let original = "---\nhalo:\n  site: https://x\n  name: abc\n---\nbody\n";
    fs::write(&file, original).expect("write");

    halosync_cmd(home.path())
        .arg("pull")
        .arg(&file)
        .assert()
        .failure()
        .stderr(contains("document belongs to https://x"));
    assert_eq!(fs::read_to_string(&file).expect("read"), original);
}

#[test]
fn unknown_site_flag_fails() {
    let home = TempDir::new().expect("home");
    add_site(home.path(), "blog", "https://blog.example");
    halosync_cmd(home.path())
        .args(["--site", "nope", "list"])
        .assert()
        .failure()
        .stderr(contains("unknown site 'nope'"));
}

#[test]
fn init_writes_a_draft_metadata_block() {
    let home = TempDir::new().expect("home");
    let docs = TempDir::new().expect("docs");
    let file = docs.path().join("note.md");
    fs::write(&file, "# Note\n").expect("write");

    halosync_cmd(home.path())
        .arg("init")
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("Metadata written"));

    let text = fs::read_to_string(&file).expect("read");
    assert!(text.starts_with("---\ntitle: note\n"), "{text}");
    assert!(text.contains("slug-strategy: shortUUID"), "{text}");
    assert!(
        text.contains("publish: 'false'") || text.contains("publish: \"false\""),
        "publish must stay a string: {text}"
    );
    assert!(text.ends_with("---\n# Note\n"), "{text}");
}
