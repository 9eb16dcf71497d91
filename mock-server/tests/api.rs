use axum::http::{self, Request, StatusCode};
use axum::routing::RouterIntoService;
use http_body_util::BodyExt;
use mock_server::{app, Record, Topic};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

/// Send one request through a shared router so state persists between calls.
async fn send(
    app: &mut RouterIntoService<String>,
    request: Request<String>,
) -> axum::response::Response {
    use tower::Service;

    ServiceExt::ready(app)
        .await
        .unwrap()
        .call(request)
        .await
        .unwrap()
}

// --- list ---

#[tokio::test]
async fn list_topics_empty() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/topics/"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let topics: Vec<Topic> = body_json(resp).await;
    assert!(topics.is_empty());
}

#[tokio::test]
async fn list_records_empty() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/records/"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let records: Vec<Record> = body_json(resp).await;
    assert!(records.is_empty());
}

// --- create ---

#[tokio::test]
async fn create_topic_returns_201() {
    let resp = app()
        .oneshot(json_request("POST", "/api/topics/", r#"{"title":"Algebra"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let topic: Topic = body_json(resp).await;
    assert_eq!(topic.id, 1);
    assert_eq!(topic.title, "Algebra");
}

#[tokio::test]
async fn create_topic_blank_title_returns_400() {
    let resp = app()
        .oneshot(json_request("POST", "/api/topics/", r#"{"title":"  "}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = body_json(resp).await;
    assert!(body["title"].is_array());
}

#[tokio::test]
async fn create_topic_malformed_json_is_rejected() {
    let resp = app()
        .oneshot(json_request("POST", "/api/topics/", r#"{"not_title":1}"#))
        .await
        .unwrap();

    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn create_record_with_unknown_topic_returns_400() {
    let resp = app()
        .oneshot(json_request("POST", "/api/records/", r#"{"topic":99}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = body_json(resp).await;
    assert!(body["topic"][0].as_str().unwrap().contains("99"));
}

#[tokio::test]
async fn create_record_applies_defaults() {
    let mut app = app().into_service();
    send(&mut app, json_request("POST", "/api/topics/", r#"{"title":"Rust"}"#)).await;

    let resp = send(&mut app, json_request("POST", "/api/records/", r#"{"topic":1}"#)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let record: Record = body_json(resp).await;
    assert_eq!(record.minutes, 0);
    assert_eq!(record.planned_minutes, 0);
    assert!(record.memo.is_none());
    assert_eq!(record.date.len(), "YYYY-MM-DD".len());
}

#[tokio::test]
async fn create_record_bad_date_returns_400() {
    let mut app = app().into_service();
    send(&mut app, json_request("POST", "/api/topics/", r#"{"title":"Rust"}"#)).await;

    let resp = send(
        &mut app,
        json_request("POST", "/api/records/", r#"{"topic":1,"date":"yesterday"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_record_normalises_unpadded_date() {
    let mut app = app().into_service();
    send(&mut app, json_request("POST", "/api/topics/", r#"{"title":"Rust"}"#)).await;

    let resp = send(
        &mut app,
        json_request("POST", "/api/records/", r#"{"topic":1,"date":"2024-5-1"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let record: Record = body_json(resp).await;
    assert_eq!(record.date, "2024-05-01");

    send(
        &mut app,
        json_request("POST", "/api/records/", r#"{"topic":1,"date":"2024-12-01"}"#),
    )
    .await;
    let resp = send(&mut app, empty_request("GET", "/api/records/")).await;
    let records: Vec<Record> = body_json(resp).await;
    let dates: Vec<&str> = records.iter().map(|r| r.date.as_str()).collect();
    assert_eq!(dates, ["2024-12-01", "2024-05-01"]);
}

// --- get ---

#[tokio::test]
async fn get_record_not_found() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/records/1/"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_topic_non_integer_id_returns_400() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/topics/undefined/"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- update ---

#[tokio::test]
async fn update_topic_not_found() {
    let resp = app()
        .oneshot(json_request("PATCH", "/api/topics/7/", r#"{"title":"Nope"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_record_null_memo_clears_it() {
    let mut app = app().into_service();
    send(&mut app, json_request("POST", "/api/topics/", r#"{"title":"Rust"}"#)).await;
    send(&mut app, json_request("POST", "/api/records/", r#"{"topic":1,"memo":"old"}"#)).await;

    let resp = send(&mut app, json_request("PATCH", "/api/records/1/", r#"{"minutes":5}"#)).await;
    let kept: Record = body_json(resp).await;
    assert_eq!(kept.memo.as_deref(), Some("old"));

    let resp = send(&mut app, json_request("PATCH", "/api/records/1/", r#"{"memo":null}"#)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cleared: Record = body_json(resp).await;
    assert!(cleared.memo.is_none());
    assert_eq!(cleared.minutes, 5);
}

#[tokio::test]
async fn update_record_normalises_date() {
    let mut app = app().into_service();
    send(&mut app, json_request("POST", "/api/topics/", r#"{"title":"Rust"}"#)).await;
    send(&mut app, json_request("POST", "/api/records/", r#"{"topic":1}"#)).await;

    let resp = send(&mut app, json_request("PATCH", "/api/records/1/", r#"{"date":"2024-3-9"}"#)).await;
    let record: Record = body_json(resp).await;
    assert_eq!(record.date, "2024-03-09");
}

// --- delete ---

#[tokio::test]
async fn delete_record_not_found() {
    let resp = app()
        .oneshot(empty_request("DELETE", "/api/records/42/"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_topic_cascades_to_records() {
    let mut app = app().into_service();
    send(&mut app, json_request("POST", "/api/topics/", r#"{"title":"Keep"}"#)).await;
    send(&mut app, json_request("POST", "/api/topics/", r#"{"title":"Drop"}"#)).await;
    send(&mut app, json_request("POST", "/api/records/", r#"{"topic":1,"minutes":10}"#)).await;
    send(&mut app, json_request("POST", "/api/records/", r#"{"topic":2,"minutes":20}"#)).await;

    let resp = send(&mut app, empty_request("DELETE", "/api/topics/2/")).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = send(&mut app, empty_request("GET", "/api/records/")).await;
    let records: Vec<Record> = body_json(resp).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].topic, 1);
}

// --- ordering ---

#[tokio::test]
async fn records_are_listed_newest_first() {
    let mut app = app().into_service();
    send(&mut app, json_request("POST", "/api/topics/", r#"{"title":"History"}"#)).await;
    for date in ["2024-01-02", "2024-03-01", "2023-12-31"] {
        let body = format!(r#"{{"topic":1,"date":"{date}"}}"#);
        send(&mut app, json_request("POST", "/api/records/", &body)).await;
    }

    let resp = send(&mut app, empty_request("GET", "/api/records/")).await;
    let records: Vec<Record> = body_json(resp).await;
    let dates: Vec<&str> = records.iter().map(|r| r.date.as_str()).collect();
    assert_eq!(dates, ["2024-03-01", "2024-01-02", "2023-12-31"]);
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    let mut app = app().into_service();

    // create topic
    let resp = send(&mut app, json_request("POST", "/api/topics/", r#"{"title":"Algebra"}"#)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let topic: Topic = body_json(resp).await;

    // rename topic
    let resp = send(
        &mut app,
        json_request(
            "PATCH",
            &format!("/api/topics/{}/", topic.id),
            &format!(r#"{{"id":{},"title":"Algebra II"}}"#, topic.id),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let renamed: Topic = body_json(resp).await;
    assert_eq!(renamed.id, topic.id);
    assert_eq!(renamed.title, "Algebra II");

    // create record
    let resp = send(
        &mut app,
        json_request(
            "POST",
            "/api/records/",
            &format!(r#"{{"topic":{},"date":"2024-05-01","planned_minutes":60}}"#, topic.id),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Record = body_json(resp).await;
    assert_eq!(created.planned_minutes, 60);
    let id = created.id;

    // partial update: only minutes
    let resp = send(
        &mut app,
        json_request("PATCH", &format!("/api/records/{id}/"), r#"{"minutes":45}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Record = body_json(resp).await;
    assert_eq!(updated.minutes, 45);
    assert_eq!(updated.planned_minutes, 60); // unchanged
    assert_eq!(updated.date, "2024-05-01"); // unchanged

    // get
    let resp = send(&mut app, empty_request("GET", &format!("/api/records/{id}/"))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Record = body_json(resp).await;
    assert_eq!(fetched.minutes, 45);

    // delete
    let resp = send(&mut app, empty_request("DELETE", &format!("/api/records/{id}/"))).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let body = body_bytes(resp).await;
    assert!(body.is_empty());

    // get after delete: 404
    let resp = send(&mut app, empty_request("GET", &format!("/api/records/{id}/"))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // list after delete: empty
    let resp = send(&mut app, empty_request("GET", "/api/records/")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let records: Vec<Record> = body_json(resp).await;
    assert!(records.is_empty());
}
