//! Tests for the `zint-vendor` binary.

use crate::common::{TestProject, expected};
use predicates::prelude::*;
use serial_test::serial;
use zint_vendor::test_utils::fixtures::CMAKE_LISTS;
use zint_vendor::test_utils::{FixtureArchive, OneShotServer, http_response};

#[test]
fn test_resolve_defaults_to_master() {
    let project = TestProject::new();

    project
        .command()
        .arg("resolve")
        .assert()
        .success()
        .stdout(predicate::str::contains("ref:    master"))
        .stdout(predicate::str::contains("origin: default branch"))
        .stdout(predicate::str::contains(
            "url:    https://github.com/zint/zint/archive/master.tar.gz",
        ));
}

#[test]
fn test_resolve_reads_package_json() {
    let project = TestProject::new();
    project.write("package.json", r#"{"name": "zint-wrapper", "zintVersion": "2.11.1"}"#);

    project
        .command()
        .arg("resolve")
        .assert()
        .success()
        .stdout(predicate::str::contains("ref:    2.11.1"))
        .stdout(predicate::str::contains("origin: package.json"));

    project
        .command()
        .args(["resolve", "--ref", "2.13.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ref:    2.13.0"))
        .stdout(predicate::str::contains("origin: command line"));
}

#[test]
#[serial]
fn test_config_path_from_environment() {
    let project = TestProject::new();
    let config = project.write("ci/zint.toml", "version = \"2.10.0\"\nvendor_dir = \"third_party/zint\"\n");

    project
        .command()
        .env("ZINT_VENDOR_CONFIG", &config)
        .arg("resolve")
        .assert()
        .success()
        .stdout(predicate::str::contains("ref:    2.10.0"))
        .stdout(predicate::str::contains("origin: zint-vendor.toml"))
        .stdout(predicate::str::contains("third_party"));
}

#[test]
fn test_invalid_config_is_reported() {
    let project = TestProject::new();
    project.write("zint-vendor.toml", "vendor_dir = \"../outside\"\n");

    project
        .command()
        .arg("resolve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"))
        .stderr(predicate::str::contains("suggestion"));
}

#[test]
fn test_configure_writes_header() {
    let project = TestProject::new();
    project.write(".zint/CMakeLists.txt", CMAKE_LISTS);

    project
        .command()
        .arg("configure")
        .assert()
        .success()
        .stdout(predicate::str::contains("4 version definitions"));

    assert_eq!(project.read(".zint/backend/zintconfig.h"), expected("zintconfig.h"));
}

#[test]
fn test_configure_failure_names_stage() {
    let project = TestProject::new();
    project.write(".zint/CMakeLists.txt", "project(zint-package)\n");

    project
        .command()
        .arg("configure")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("configure stage failed"))
        .stderr(predicate::str::contains("No version tokens found"));

    assert!(!project.path().join(".zint/backend/zintconfig.h").exists());
}

#[test]
fn test_patch_and_clean() {
    let project = TestProject::new();
    project.write(".zint/backend/library.c", zint_vendor::test_utils::fixtures::LIBRARY_C);

    project
        .command()
        .arg("patch")
        .assert()
        .success()
        .stdout(predicate::str::contains("Applied 2 replacements"));
    assert_eq!(project.read(".zint/backend/library.c"), expected("library.c"));

    // Already patched: the include is still present, the stdout site is gone
    project
        .command()
        .arg("patch")
        .assert()
        .failure()
        .stderr(predicate::str::contains("patch stage failed"));

    project.command().arg("clean").assert().success();
    assert!(!project.path().join(".zint").exists());

    project
        .command()
        .arg("clean")
        .assert()
        .success()
        .stdout(predicate::str::contains("does not exist"));
}

#[test]
fn test_install_unreachable_host_fails_fetch_stage() {
    let project = TestProject::new();
    // Bind then drop to get a port nothing listens on
    let port = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
    project.write(
        "zint-vendor.toml",
        &format!("archive_url = \"http://127.0.0.1:{port}/{{ref}}.tar.gz\"\n"),
    );

    project
        .command()
        .args(["--no-progress", "install"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("fetch stage failed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_install_from_local_server() {
    let project = TestProject::new();
    let body = FixtureArchive::zint("zint-2.13.0").tar_gz();
    let server = OneShotServer::start(http_response("200 OK", &body)).await;
    project.write(
        "zint-vendor.toml",
        &format!("archive_url = \"{}\"\n", server.url("/archive/{ref}.tar.gz")),
    );

    let mut cmd = project.command();
    cmd.args(["--no-progress", "install", "--ref", "2.13.0"]);
    let assert = tokio::task::spawn_blocking(move || cmd.assert()).await.unwrap();

    assert
        .success()
        .stdout(predicate::str::contains("Installation complete!"))
        .stdout(predicate::str::contains("zint 2.13.0 vendored"));
    assert!(server.request().await.starts_with("GET /archive/2.13.0.tar.gz"));
    assert_eq!(project.read(".zint/backend/library.c"), expected("library.c"));
    assert_eq!(project.read(".zint/backend/zintconfig.h"), expected("zintconfig.h"));
}
