#[path = "common/mod.rs"]
mod common;

use std::time::Duration;

use common::http_stub::HttpStub;
use common::mock_data::ids;
use roster::auth::HttpAuthClient;
use roster::{
    DirectoryClient, ErrorKind, HttpDirectoryClient, RecordId, RecordPatch, RosterError, Session,
};
use secrecy::ExposeSecret;
use serial_test::serial;

const TOKEN: &str = "QpwL5tke4Pnpja7X4";

const PAGE_TWO: &str = r#"{
    "page": 2,
    "per_page": 2,
    "total": 4,
    "total_pages": 2,
    "data": [
        {"id": 3, "email": "emma.wong@reqres.in", "first_name": "Emma", "last_name": "Wong", "avatar": "https://reqres.in/img/faces/3-image.jpg"},
        {"id": 4, "email": "eve.holt@reqres.in", "first_name": "Eve", "last_name": "Holt", "avatar": "https://reqres.in/img/faces/4-image.jpg"}
    ],
    "support": {"url": "https://reqres.in/#support-heading", "text": "Thanks!"}
}"#;

fn directory(stub: &HttpStub) -> HttpDirectoryClient {
    HttpDirectoryClient::new(&stub.base_url, Duration::from_secs(5))
        .unwrap()
        .with_session(&Session::new(TOKEN))
}

#[tokio::test]
#[serial]
async fn test_fetch_page_parses_list_response() {
    let stub = HttpStub::start(vec![(200, PAGE_TWO)]).await;

    let page = directory(&stub).fetch_page(2).await.unwrap();
    assert_eq!(page.number, 2);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.per_page, Some(2));
    assert_eq!(ids(&page.records), vec![3, 4]);
    assert_eq!(page.records[1].full_name(), "Eve Holt");

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].target, "/api/users?page=2");
    assert_eq!(
        requests[0].header("authorization"),
        Some(format!("Bearer {TOKEN}").as_str())
    );
}

#[tokio::test]
#[serial]
async fn test_update_puts_record_fields() {
    let stub = HttpStub::start(vec![(
        200,
        r#"{"first_name": "Emma", "updatedAt": "2026-10-19T09:00:00.000Z"}"#,
    )])
    .await;

    let patch = RecordPatch {
        first_name: Some("Emma".to_string()),
        last_name: Some("Wong".to_string()),
        email: Some("emma@example.com".to_string()),
        avatar: Some("https://reqres.in/img/faces/3-image.jpg".to_string()),
    };
    directory(&stub)
        .update_record(RecordId(3), &patch)
        .await
        .unwrap();

    let requests = stub.requests();
    assert_eq!(requests[0].method, "PUT");
    assert_eq!(requests[0].target, "/api/users/3");
    assert_eq!(
        requests[0].json(),
        serde_json::json!({
            "first_name": "Emma",
            "last_name": "Wong",
            "email": "emma@example.com",
            "avatar": "https://reqres.in/img/faces/3-image.jpg"
        })
    );
}

#[tokio::test]
#[serial]
async fn test_delete_accepts_no_content() {
    let stub = HttpStub::start(vec![(204, "")]).await;

    directory(&stub).delete_record(RecordId(4)).await.unwrap();

    let requests = stub.requests();
    assert_eq!(requests[0].method, "DELETE");
    assert_eq!(requests[0].target, "/api/users/4");
}

#[tokio::test]
#[serial]
async fn test_server_error_is_network_error() {
    let stub = HttpStub::start(vec![(500, r#"{"error": "boom"}"#)]).await;

    let err = directory(&stub).fetch_page(1).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
#[serial]
async fn test_unauthorized_is_auth_error() {
    let stub = HttpStub::start(vec![(401, r#"{"error": "missing API key"}"#)]).await;

    let err = directory(&stub).delete_record(RecordId(1)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Auth);
}

#[tokio::test]
#[serial]
async fn test_login_returns_session() {
    let stub = HttpStub::start(vec![(200, r#"{"token": "QpwL5tke4Pnpja7X4"}"#)]).await;
    let client = HttpAuthClient::new(&stub.base_url, Duration::from_secs(5)).unwrap();

    let session = client
        .login("eve.holt@reqres.in", "cityslicka")
        .await
        .unwrap();
    assert_eq!(session.token().expose_secret(), TOKEN);

    let requests = stub.requests();
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].target, "/api/login");
    assert_eq!(requests[0].header("authorization"), None);
    assert_eq!(
        requests[0].json(),
        serde_json::json!({ "email": "eve.holt@reqres.in", "password": "cityslicka" })
    );
}

#[tokio::test]
#[serial]
async fn test_login_rejection_keeps_server_message() {
    let stub = HttpStub::start(vec![(400, r#"{"error": "user not found"}"#)]).await;
    let client = HttpAuthClient::new(&stub.base_url, Duration::from_secs(5)).unwrap();

    let err = client
        .login("peter@klaven", "cityslicka")
        .await
        .unwrap_err();
    assert!(matches!(&err, RosterError::Auth(message) if message == "user not found"));
}
