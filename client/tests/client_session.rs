//! End-to-end session behaviour of the assembled client over real HTTP.
//!
//! The client is built from settings exactly as the binary builds it, with
//! the session persisted to a temporary directory and a fake GraphQL server
//! standing in for the API.

mod support;

use std::path::Path;

use lms_client::context::AuthState;
use lms_client::domain::ErrorClass;
use lms_client::domain::curriculum::NewSection;
use lms_client::domain::ids::CourseId;
use lms_client::domain::media::{FileUpload, UploadKind};
use lms_client::domain::ports::NotificationLevel;
use lms_client::{ClientSettings, LmsClient};
use serde_json::json;
use support::{FakeGraphqlServer, FakeReply};
use tempfile::TempDir;

fn settings(server: &FakeGraphqlServer, session_dir: &Path) -> ClientSettings {
    ClientSettings {
        endpoint: Some(server.endpoint().to_string()),
        request_timeout_ms: Some(5_000),
        user_agent: None,
        session_dir: Some(session_dir.to_path_buf()),
        loading_grace_ms: Some(0),
    }
}

fn login_reply() -> FakeReply {
    FakeReply::data(json!({
        "login": {
            "success": true,
            "token": "T",
            "refreshToken": "R",
            "user": { "id": "u1", "email": "ada@example.com", "firstName": "Ada" }
        }
    }))
}

#[actix_rt::test]
async fn login_persists_the_session_for_later_runs() {
    let server = FakeGraphqlServer::start(vec![
        login_reply(),
        FakeReply::data(json!({ "getCourseSections": [] })),
    ])
    .await;
    let dir = TempDir::new().expect("tempdir");

    let first = LmsClient::from_settings(&settings(&server, dir.path())).expect("client");
    assert_eq!(first.initialize().expect("init"), AuthState::Unauthenticated);
    first
        .sessions()
        .login("ada@example.com", "pw")
        .await
        .expect("login");

    let second = LmsClient::from_settings(&settings(&server, dir.path())).expect("client");
    let state = second.initialize().expect("init");
    assert_eq!(state.user().map(|u| u.id.as_str()), Some("u1"));
    second
        .sections()
        .course_sections(CourseId::new(4))
        .await
        .expect("sections");

    let seen = server.requests();
    assert_eq!(seen[0].header("authorization"), None);
    assert_eq!(seen[0].json()["variables"]["email"], "ada@example.com");
    assert_eq!(seen[1].header("authorization"), Some("Bearer T"));
    server.stop().await;
}

#[actix_rt::test]
async fn logout_stops_attaching_the_credential() {
    let server = FakeGraphqlServer::start(vec![
        login_reply(),
        FakeReply::data(json!({ "getCourseSections": [] })),
    ])
    .await;
    let dir = TempDir::new().expect("tempdir");
    let client = LmsClient::from_settings(&settings(&server, dir.path())).expect("client");
    client
        .sessions()
        .login("ada@example.com", "pw")
        .await
        .expect("login");

    client.sessions().logout().expect("logout");
    client
        .sections()
        .course_sections(CourseId::new(4))
        .await
        .expect("public sections");

    assert!(!client.auth().is_authenticated());
    assert_eq!(server.requests()[1].header("authorization"), None);
    let reloaded = LmsClient::from_settings(&settings(&server, dir.path())).expect("client");
    assert_eq!(reloaded.initialize().expect("init"), AuthState::Unauthenticated);
    server.stop().await;
}

#[actix_rt::test]
async fn expired_credentials_surface_as_authentication_failures() {
    let server = FakeGraphqlServer::start(vec![
        login_reply(),
        FakeReply::error("Unauthorized", Some("UNAUTHENTICATED")),
    ])
    .await;
    let dir = TempDir::new().expect("tempdir");
    let client = LmsClient::from_settings(&settings(&server, dir.path())).expect("client");
    let mut notifications = client.notifications();
    client
        .sessions()
        .login("ada@example.com", "pw")
        .await
        .expect("login");

    let err = client
        .sections()
        .create_section(NewSection {
            course_id: CourseId::new(1),
            title: "Intro".to_owned(),
            description: String::new(),
            order: 1,
        })
        .await
        .expect_err("rejected");

    assert_eq!(err.class(), ErrorClass::Authentication);
    assert!(err.requires_login());
    let success = notifications.recv().await.expect("login toast");
    let failure = notifications.recv().await.expect("failure toast");
    assert_eq!(success.level, NotificationLevel::Success);
    assert_eq!(failure.level, NotificationLevel::Error);
    assert_eq!(failure.class, Some(ErrorClass::Authentication));
    server.stop().await;
}

#[actix_rt::test]
async fn uploads_report_progress_and_the_stored_url() {
    let server = FakeGraphqlServer::start(vec![
        login_reply(),
        FakeReply::data(json!({
            "uploadFile": {
                "success": true,
                "url": "https://cdn.example.com/slides.pdf",
                "fileName": "slides.pdf",
                "size": 4
            }
        })),
    ])
    .await;
    let dir = TempDir::new().expect("tempdir");
    let client = LmsClient::from_settings(&settings(&server, dir.path())).expect("client");
    client
        .sessions()
        .login("ada@example.com", "pw")
        .await
        .expect("login");

    let result = client
        .uploads()
        .upload_file(FileUpload::new("slides.pdf", vec![1, 2, 3, 4]), UploadKind::Resource)
        .await
        .expect("upload");

    assert_eq!(result.url.as_deref(), Some("https://cdn.example.com/slides.pdf"));
    assert_eq!(client.uploads().progress().percent(), 100);
    assert!(!client.uploads().is_uploading());
    let body = server.requests()[1].text();
    assert!(body.contains(r#"filename="slides.pdf""#));
    server.stop().await;
}
