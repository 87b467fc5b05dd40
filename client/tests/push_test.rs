//! Package upload and distribution catalog against a mock server.

use std::path::PathBuf;

use packagecloud_client::{Client, ClientConfig, ClientError, Distro, PushPackageOptions, Repo};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PACKAGES: &str = "/api/v1/repos/ecorp/staging/packages.json";

fn client(server: &MockServer) -> Client {
    Client::new(ClientConfig::new(server.uri(), "secret")).unwrap()
}

fn package_file(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("agent_1.0.0_amd64.deb");
    std::fs::write(&path, b"!<arch>\ndebian-binary").unwrap();
    path
}

fn options(file_path: PathBuf) -> PushPackageOptions {
    PushPackageOptions {
        repo: Repo::new("ecorp", "staging"),
        distro_version_id: 190,
        file_path,
    }
}

#[tokio::test]
async fn test_push_sends_multipart_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PACKAGES))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .and(body_string_contains(r#"name="package[distro_version_id]""#))
        .and(body_string_contains("190"))
        .and(body_string_contains(r#"name="package[package_file]"; filename="agent_1.0.0_amd64.deb""#))
        .and(body_string_contains("debian-binary"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"filename": "agent_1.0.0_amd64.deb"})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let body = client(&server)
        .push_package(&options(package_file(&dir)))
        .await
        .unwrap();
    assert!(String::from_utf8_lossy(&body).contains("agent_1.0.0_amd64.deb"));
}

#[tokio::test]
async fn test_push_duplicate_filename_is_already_exists() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PACKAGES))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"filename": ["has already been taken"]})),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let err = client(&server)
        .push_package(&options(package_file(&dir)))
        .await
        .unwrap_err();
    assert!(err.is_already_exists());
    assert_eq!(err.to_string(), "push package failed: package already exists");
}

#[tokio::test]
async fn test_push_other_422_is_generic() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PACKAGES))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"filename": ["is invalid"]})))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let err = client(&server)
        .push_package(&options(package_file(&dir)))
        .await
        .unwrap_err();
    assert!(!err.is_already_exists());
    match err.root() {
        ClientError::Api { status, body } => {
            assert_eq!(status.as_u16(), 422);
            assert!(body.contains("is invalid"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_push_missing_file_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let err = client(&server)
        .push_package(&options(dir.path().join("absent.deb")))
        .await
        .unwrap_err();
    assert!(matches!(err.root(), ClientError::Io(_)));
}

#[tokio::test]
async fn test_distributions_resolves_distro_version_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/distributions.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "deb": [{
                "display_name": "Ubuntu",
                "index_name": "ubuntu",
                "versions": [
                    {"id": 190, "display_name": "20.04 Focal Fossa", "index_name": "focal", "version_number": "20.04"},
                    {"id": 237, "display_name": "22.04 Jammy Jellyfish", "index_name": "jammy", "version_number": "22.04"}
                ]
            }],
            "rpm": [{
                "display_name": "Enterprise Linux",
                "index_name": "el",
                "versions": [{"id": 205, "display_name": "8.0", "index_name": "8", "version_number": "8.0"}]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let catalog = client(&server).distributions().await.unwrap();
    assert_eq!(catalog.package_types().collect::<Vec<_>>(), vec!["deb", "rpm"]);
    assert_eq!(catalog.distro_version_id("deb", &Distro::new("ubuntu", "jammy")).unwrap(), 237);
    assert_eq!(catalog.distro_version_id("rpm", &Distro::new("el", "8")).unwrap(), 205);
    assert!(catalog.distro_version_id("rpm", &Distro::new("ubuntu", "focal")).is_err());
}

#[tokio::test]
async fn test_distributions_payment_required() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(402).set_body_json(json!({"error": ["payment required"]})))
        .mount(&server)
        .await;

    let err = client(&server).distributions().await.unwrap_err();
    assert!(err.is_payment_required());
    assert_eq!(err.to_string(), "list distributions failed: payment required");
}
