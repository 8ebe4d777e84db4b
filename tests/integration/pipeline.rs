//! Full pipeline runs compared against golden files.

use crate::common::{TestProject, expected};
use zint_vendor::config::{ProjectConfig, VendorSettings};
use zint_vendor::core::{Stage, VendorError};
use zint_vendor::fetch::HttpArchiveSource;
use zint_vendor::pipeline::VendorPipeline;
use zint_vendor::test_utils::{FixtureArchive, OneShotServer, StaticArchiveSource, http_response};

fn local_client() -> reqwest::Client {
    HttpArchiveSource::client_builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn test_vendored_tree_matches_golden_files() {
    let project = TestProject::new();
    let source = StaticArchiveSource::new(FixtureArchive::zint("zint-2.13.0").tar_gz());
    let pipeline = VendorPipeline::new(VendorSettings::new(project.path()), source);

    pipeline.run("2.13.0").await.unwrap();

    assert_eq!(project.read(".zint/backend/library.c"), expected("library.c"));
    assert_eq!(project.read(".zint/backend/zintconfig.h"), expected("zintconfig.h"));
    assert!(project.path().join(".zint/README").is_file());
    assert!(!project.path().join(".zint/zint-2.13.0").exists());
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let project = TestProject::new();
    let archive = FixtureArchive::zint("zint-master").tar_gz();

    for _ in 0..2 {
        let source = StaticArchiveSource::new(archive.clone());
        VendorPipeline::new(VendorSettings::new(project.path()), source)
            .run("master")
            .await
            .unwrap();
    }

    // Patching twice would insert the include twice
    assert_eq!(project.read(".zint/backend/library.c"), expected("library.c"));
}

#[tokio::test]
async fn test_config_file_drives_the_run() {
    let project = TestProject::new();
    project.write(
        "zint-vendor.toml",
        r#"
version = "2.12.0"
vendor_dir = "native/zint"
archive_url = "https://mirror.example/zint-{ref}.tgz"

[[patch]]
file = "README"
replace = [{ find = "Zint", with = "zint" }]
"#,
    );

    let config = ProjectConfig::load(project.path(), None).await.unwrap();
    let settings = VendorSettings::from_project(&config);
    let resolved = settings.resolve_ref(None).await.unwrap();
    let source = StaticArchiveSource::new(FixtureArchive::zint("zint-2.12.0").tar_gz());
    let pipeline = VendorPipeline::new(settings, source);

    let report = pipeline.run(&resolved.name).await.unwrap();

    assert_eq!(report.url, "https://mirror.example/zint-2.12.0.tgz");
    assert_eq!(project.read("native/zint/README"), "zint barcode generator\n");
    // Configured rules replace the built-in ones
    assert_eq!(
        project.read("native/zint/backend/library.c"),
        zint_vendor::test_utils::fixtures::LIBRARY_C
    );
    assert_eq!(project.read("native/zint/backend/zintconfig.h"), expected("zintconfig.h"));
}

#[tokio::test]
async fn test_http_download_end_to_end() {
    let project = TestProject::new();
    let body = FixtureArchive::zint("zint-master").tar_gz();
    let server = OneShotServer::start(http_response("200 OK", &body)).await;

    let mut settings = VendorSettings::new(project.path());
    settings.archive_url = server.url("/zint/archive/{ref}.tar.gz");
    let source = HttpArchiveSource::with_client(local_client(), false);

    let report = VendorPipeline::new(settings, source).run("master").await.unwrap();

    assert!(server.request().await.starts_with("GET /zint/archive/master.tar.gz HTTP/1.1"));
    assert_eq!(report.extract.files, 5);
    assert_eq!(project.read(".zint/backend/zintconfig.h"), expected("zintconfig.h"));
}

#[tokio::test]
async fn test_truncated_download_leaves_no_tree() {
    let project = TestProject::new();
    let body = FixtureArchive::zint("zint-master").tar_gz();
    let mut response = format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len() + 4096
    )
    .into_bytes();
    response.extend_from_slice(&body[..body.len() / 2]);
    let server = OneShotServer::start(response).await;

    let mut settings = VendorSettings::new(project.path());
    settings.archive_url = server.url("/{ref}.tar.gz");
    let source = HttpArchiveSource::with_client(local_client(), false);

    let err = VendorPipeline::new(settings, source).run("master").await.unwrap_err();

    assert_eq!(err.stage, Stage::Fetch);
    assert!(matches!(err.source, VendorError::StreamTruncated { .. }));
    assert!(!project.path().join(".zint/CMakeLists.txt").exists());
}
