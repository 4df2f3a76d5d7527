#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use schoolhub_api::endpoints::{
    ANNOUNCEMENTS, APPROVE, ATTENDANCE_SUMMARY_EXPORT, EVENTS, LIBRARY_BOOKS, LIBRARY_REQUESTS,
};
use schoolhub_api::{ApiClient, Error, ListQuery, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api", server.uri())).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

// ── List tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_bare_array() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "e1", "title": "Sports Day" },
            { "_id": "e2", "title": "Science Fair" }
        ])))
        .mount(&server)
        .await;

    let page = client.list::<Value>(&EVENTS, &ListQuery::new()).await.unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[1]["title"], "Science Fair");
    assert!(page.meta.is_empty());
}

#[tokio::test]
async fn test_list_wrapped_with_meta() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/library/books"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "books": [{ "_id": "b1", "title": "Dune" }],
            "total": 57
        })))
        .mount(&server)
        .await;

    let page = client
        .list::<Value>(&LIBRARY_BOOKS, &ListQuery::new())
        .await
        .unwrap();

    assert_eq!(page.items, vec![json!({ "_id": "b1", "title": "Dune" })]);
    assert_eq!(page.meta.get("total"), Some(&json!(57)));
}

#[tokio::test]
async fn test_list_sends_query_params() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/announcements"))
        .and(query_param("search", "exam"))
        .and(query_param("priority", "high"))
        .and(query_param("class", "10A"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "announcements": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let query = ListQuery::new()
        .search("exam")
        .priority("high")
        .filter("class", "10A");
    let page = client.list::<Value>(&ANNOUNCEMENTS, &query).await.unwrap();

    assert!(page.items.is_empty());
}

#[tokio::test]
async fn test_list_unrecognized_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/library/books"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    let result = client.list::<Value>(&LIBRARY_BOOKS, &ListQuery::new()).await;

    assert!(
        matches!(result, Err(Error::Envelope { .. })),
        "expected Envelope error, got: {result:?}"
    );
}

// ── Mutation tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_create_returns_entity_and_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/announcements"))
        .and(body_json(json!({ "title": "Exam Notice" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "announcement": { "_id": "a9", "title": "Exam Notice" },
            "message": "Announcement published"
        })))
        .mount(&server)
        .await;

    let created = client
        .create::<Value, _>(&ANNOUNCEMENTS, &json!({ "title": "Exam Notice" }))
        .await
        .unwrap();

    assert_eq!(created.entity["_id"], "a9");
    assert_eq!(created.message.as_deref(), Some("Announcement published"));
}

#[tokio::test]
async fn test_update_puts_to_item_path() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/events/e1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "_id": "e1", "title": "Sports Day (moved)" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let updated = client
        .update::<Value, _>(&EVENTS, "e1", &json!({ "title": "Sports Day (moved)" }))
        .await
        .unwrap();

    assert_eq!(updated.entity["title"], "Sports Day (moved)");
    assert_eq!(updated.message, None);
}

#[tokio::test]
async fn test_delete_with_empty_body() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/library/books/b1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let ack = client.delete(&LIBRARY_BOOKS, "b1").await.unwrap();

    assert_eq!(ack.message, None);
}

#[tokio::test]
async fn test_action_uses_route_method_and_suffix() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/api/library/requests/r1/approve"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Request approved",
            "issue": { "_id": "i4" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ack = client
        .action_ack(&LIBRARY_REQUESTS, "r1", &APPROVE, None)
        .await
        .unwrap();

    assert_eq!(ack.message.as_deref(), Some("Request approved"));
    assert!(ack.meta.contains_key("issue"));
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_error_body_message_is_surfaced() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/library/books"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "ISBN already exists" })),
        )
        .mount(&server)
        .await;

    let err = client
        .create::<Value, _>(&LIBRARY_BOOKS, &json!({ "isbn": "978-0441013593" }))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(err.server_message(), Some("ISBN already exists"));
}

#[tokio::test]
async fn test_error_without_json_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/events"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let err = client.list::<Value>(&EVENTS, &ListQuery::new()).await.unwrap_err();

    assert!(
        matches!(err, Error::Api { status: 500, message: None }),
        "expected Api error without message, got: {err:?}"
    );
}

#[tokio::test]
async fn test_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/events/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Event not found" })))
        .mount(&server)
        .await;

    let err = client.delete(&EVENTS, "missing").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.server_message(), Some("Event not found"));
}

// ── Download tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_download_reads_disposition() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/attendance/summary/export"))
        .and(query_param("class", "10A"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "content-disposition",
                    r#"attachment; filename="attendance-10A.xlsx""#,
                )
                .set_body_raw(
                    b"PK\x03\x04spreadsheet".to_vec(),
                    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                ),
        )
        .mount(&server)
        .await;

    let blob = client
        .download(ATTENDANCE_SUMMARY_EXPORT, &ListQuery::new().filter("class", "10A"))
        .await
        .unwrap();

    assert_eq!(blob.filename.as_deref(), Some("attendance-10A.xlsx"));
    assert_eq!(
        blob.content_type.as_deref(),
        Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
    );
    assert_eq!(&blob.bytes[..2], b"PK");
}

// ── Session cookie tests ────────────────────────────────────────────

#[tokio::test]
async fn test_session_cookie_travels_with_requests() {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api", server.uri())).unwrap();
    let client = ApiClient::new(base_url, &TransportConfig::default()).unwrap();

    let cookie: SecretString = "connect.sid=s%3Aabc123".to_string().into();
    assert!(client.seed_session_cookie(&cookie));

    Mock::given(method("GET"))
        .and(path("/api/events"))
        .and(header("cookie", "connect.sid=s%3Aabc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    client.list::<Value>(&EVENTS, &ListQuery::new()).await.unwrap();
}

#[tokio::test]
async fn test_prebuilt_client_has_no_jar() {
    let (_server, client) = setup().await;
    let cookie: SecretString = "sid=1".to_string().into();

    assert!(!client.seed_session_cookie(&cookie));
    assert_eq!(client.cookie_header(), None);
}
