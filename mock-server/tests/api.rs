use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Echo, ErrorBody, Note};
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

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- notes ---

#[tokio::test]
async fn list_notes_empty() {
    let resp = app().oneshot(get("/notes")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let notes: Vec<Note> = body_json(resp).await;
    assert!(notes.is_empty());
}

#[tokio::test]
async fn create_note_returns_201() {
    let resp = app()
        .oneshot(json_request("POST", "/notes", r#"{"title":"Buy milk"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let note: Note = body_json(resp).await;
    assert_eq!(note.title, "Buy milk");
    assert!(!note.pinned);
}

#[tokio::test]
async fn create_note_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/notes", r#"{"not_title":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn get_note_not_found_has_error_body() {
    let resp = app()
        .oneshot(get("/notes/00000000-0000-0000-0000-000000000000"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let err: ErrorBody = body_json(resp).await;
    assert!(err.message.contains("not found"));
}

#[tokio::test]
async fn get_note_bad_uuid_returns_400() {
    let resp = app().oneshot(get("/notes/not-a-uuid")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_notes_pages_and_filters() {
    use tower::Service;

    let mut app = app().into_service();
    let mut ids = Vec::new();
    for title in ["one", "two", "three"] {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(json_request("POST", "/notes", &format!(r#"{{"title":"{title}"}}"#)))
            .await
            .unwrap();
        let note: Note = body_json(resp).await;
        ids.push(note.id);
    }

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/notes?offset=1&length=1"))
        .await
        .unwrap();
    let page: Vec<Note> = body_json(resp).await;
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].title, "two");

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("/notes?id={}", ids[2])))
        .await
        .unwrap();
    let found: Vec<Note> = body_json(resp).await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "three");

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(format!("/notes/{}", ids[0]))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(format!("/notes/{}", ids[0]))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- echo ---

#[tokio::test]
async fn echo_reflects_request() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/echo/deep/path?q=1&q=2")
                .header("x-custom", "yes")
                .body("payload".to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "PATCH");
    assert_eq!(echo.path, "/echo/deep/path");
    assert_eq!(echo.query.as_deref(), Some("q=1&q=2"));
    assert_eq!(echo.headers.get("x-custom").map(String::as_str), Some("yes"));
    assert_eq!(echo.body, "payload");
}

// --- status / malformed ---

#[tokio::test]
async fn status_route_returns_requested_code() {
    let resp = app().oneshot(get("/status/418")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::IM_A_TEAPOT);
    let err: ErrorBody = body_json(resp).await;
    assert_eq!(err.message, "requested status 418");
}

#[tokio::test]
async fn malformed_route_is_not_json() {
    let resp = app().oneshot(get("/malformed")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body_bytes(resp).await;
    assert!(serde_json::from_slice::<serde_json::Value>(&bytes).is_err());
}
