use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, ErrorBody, Stats, Task};
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

// --- list ---

#[tokio::test]
async fn list_tasks_empty() {
    let resp = app().oneshot(empty_request("GET", "/tasks")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let tasks: Vec<Task> = body_json(resp).await;
    assert!(tasks.is_empty());
}

// --- stats ---

#[tokio::test]
async fn stats_empty() {
    let resp = app().oneshot(empty_request("GET", "/tasks/stats")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let stats: Stats = body_json(resp).await;
    assert_eq!(
        stats,
        Stats {
            total: 0,
            completed: 0,
            pending: 0
        }
    );
}

// --- create ---

#[tokio::test]
async fn create_task_returns_201() {
    let resp = app()
        .oneshot(json_request("POST", "/tasks", r#"{"title":"Buy milk"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let task: Task = body_json(resp).await;
    assert_eq!(task.id, 1);
    assert_eq!(task.title, "Buy milk");
    assert!(!task.completed);
}

#[tokio::test]
async fn create_task_empty_title_returns_400() {
    for body in [r#"{"title":""}"#, r#"{"title":"   "}"#, r#"{}"#] {
        let resp = app().oneshot(json_request("POST", "/tasks", body)).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let err: ErrorBody = body_json(resp).await;
        assert_eq!(err.error, "Title is required");
    }
}

// --- complete ---

#[tokio::test]
async fn complete_unknown_task_returns_404() {
    let resp = app()
        .oneshot(empty_request("PUT", "/tasks/999/complete"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let err: ErrorBody = body_json(resp).await;
    assert_eq!(err.error, "Task not found");
}

#[tokio::test]
async fn complete_non_numeric_id_returns_400() {
    let resp = app()
        .oneshot(empty_request("PUT", "/tasks/abc/complete"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- delete ---

#[tokio::test]
async fn delete_unknown_task_returns_404() {
    let resp = app().oneshot(empty_request("DELETE", "/tasks/7")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create two
    for title in ["Task 1", "Task 2"] {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(json_request("POST", "/tasks", &format!(r#"{{"title":"{title}"}}"#)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    // complete the first
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("PUT", "/tasks/1/complete"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let completed: Task = body_json(resp).await;
    assert_eq!(completed.id, 1);
    assert!(completed.completed);

    // stats reflect it
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/tasks/stats"))
        .await
        .unwrap();
    let stats: Stats = body_json(resp).await;
    assert_eq!(
        stats,
        Stats {
            total: 2,
            completed: 1,
            pending: 1
        }
    );

    // list is in id order
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/tasks"))
        .await
        .unwrap();
    let tasks: Vec<Task> = body_json(resp).await;
    assert_eq!(tasks.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 2]);
    assert!(tasks[0].completed);
    assert!(!tasks[1].completed);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", "/tasks/1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_bytes(resp).await;
    assert!(!body.is_empty());

    // delete again: 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", "/tasks/1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // ids are never reused
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/tasks", r#"{"title":"Task 3"}"#))
        .await
        .unwrap();
    let created: Task = body_json(resp).await;
    assert_eq!(created.id, 3);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/tasks"))
        .await
        .unwrap();
    let tasks: Vec<Task> = body_json(resp).await;
    assert_eq!(tasks.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2, 3]);
}
