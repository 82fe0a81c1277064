use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, Category, Priority, Status, Subtask, Task};
use serde_json::Value;
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

async fn send(app: &Router, request: Request<String>) -> axum::response::Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn seed_category(app: &Router, name: &str) -> Category {
    let body = format!(r#"{{"name":"{name}"}}"#);
    let resp = send(app, json_request("POST", "/api/categories/", &body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await
}

async fn seed_task(app: &Router, title: &str, category_id: i64, status: &str, priority: &str) -> Task {
    let body = format!(
        r#"{{"title":"{title}","description":"","start_datetime":"2025-07-26T09:00:00Z",
            "end_datetime":"2025-07-26T11:00:00Z","status":"{status}","priority":"{priority}",
            "category_id":{category_id}}}"#
    );
    let resp = send(app, json_request("POST", "/api/tasks/", &body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await
}

// --- categories ---

#[tokio::test]
async fn list_categories_empty() {
    let resp = send(&app(), empty_request("GET", "/api/categories/")).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let categories: Vec<Category> = body_json(resp).await;
    assert!(categories.is_empty());
}

#[tokio::test]
async fn create_category_returns_201() {
    let app = app();
    let category = seed_category(&app, "Travail").await;
    assert_eq!(category.name, "Travail");

    let resp = send(&app, empty_request("GET", &format!("/api/categories/{}/", category.id))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Category = body_json(resp).await;
    assert_eq!(fetched, category);
}

#[tokio::test]
async fn blank_category_name_is_a_field_error() {
    let resp = send(&app(), json_request("POST", "/api/categories/", r#"{"name":"  "}"#)).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body["name"][0], "This field may not be blank.");
}

#[tokio::test]
async fn overlong_category_name_is_rejected() {
    let body = format!(r#"{{"name":"{}"}}"#, "x".repeat(101));
    let resp = send(&app(), json_request("POST", "/api/categories/", &body)).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert!(body["name"][0].as_str().unwrap().contains("100 characters"));
}

#[tokio::test]
async fn missing_category_returns_drf_not_found() {
    let resp = send(&app(), empty_request("GET", "/api/categories/42/")).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body, serde_json::json!({"detail": "Not found."}));
}

#[tokio::test]
async fn search_is_case_insensitive() {
    let app = app();
    seed_category(&app, "Travail").await;
    seed_category(&app, "Maison").await;
    seed_category(&app, "Travaux").await;

    let resp = send(&app, empty_request("GET", "/api/categories/?search=TRAV")).await;
    let found: Vec<Category> = body_json(resp).await;
    let names: Vec<&str> = found.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Travail", "Travaux"]);
}

#[tokio::test]
async fn put_renames_category() {
    let app = app();
    let category = seed_category(&app, "Travail").await;

    let uri = format!("/api/categories/{}/", category.id);
    let resp = send(&app, json_request("PUT", &uri, r#"{"name":"Travail Urgent"}"#)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let renamed: Category = body_json(resp).await;
    assert_eq!(renamed.id, category.id);
    assert_eq!(renamed.name, "Travail Urgent");
}

#[tokio::test]
async fn deleting_category_cascades_to_tasks_and_subtasks() {
    let app = app();
    let category = seed_category(&app, "Travail").await;
    let task = seed_task(&app, "Rapport", category.id, "a_faire", "haute").await;
    let body = format!(r#"{{"title":"Relire","task_id":{}}}"#, task.id);
    let resp = send(&app, json_request("POST", "/api/subtasks/", &body)).await;
    let subtask: Subtask = body_json(resp).await;

    let resp = send(&app, empty_request("DELETE", &format!("/api/categories/{}/", category.id))).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    let resp = send(&app, empty_request("GET", &format!("/api/tasks/{}/", task.id))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = send(&app, empty_request("GET", &format!("/api/subtasks/{}/", subtask.id))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- tasks ---

#[tokio::test]
async fn task_read_nests_category_and_defaults() {
    let app = app();
    let category = seed_category(&app, "Travail").await;
    let body = format!(
        r#"{{"title":"Rapport","description":"Q3","start_datetime":"2025-07-26T09:00:00Z",
            "end_datetime":"2025-07-26T11:00:00Z","category_id":{}}}"#,
        category.id
    );
    let resp = send(&app, json_request("POST", "/api/tasks/", &body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let task: Task = body_json(resp).await;
    assert_eq!(task.category, category);
    assert_eq!(task.status, Status::AFaire);
    assert_eq!(task.priority, Priority::Moyenne);
    assert!(task.image_path.is_none());
    assert!(task.subtasks.is_empty());
}

#[tokio::test]
async fn task_with_unknown_category_is_rejected() {
    let body = r#"{"title":"Rapport","description":"","start_datetime":"2025-07-26T09:00:00Z",
        "end_datetime":"2025-07-26T11:00:00Z","category_id":99}"#;
    let resp = send(&app(), json_request("POST", "/api/tasks/", body)).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert!(body["category_id"][0].as_str().unwrap().contains("does not exist"));
}

#[tokio::test]
async fn task_missing_title_is_required() {
    let resp = send(&app(), json_request("POST", "/api/tasks/", "{}")).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body["title"][0], "This field is required.");
}

#[tokio::test]
async fn tasks_are_listed_newest_first() {
    let app = app();
    let category = seed_category(&app, "Travail").await;
    let first = seed_task(&app, "Premier", category.id, "a_faire", "faible").await;
    let second = seed_task(&app, "Second", category.id, "a_faire", "faible").await;

    let resp = send(&app, empty_request("GET", "/api/tasks/")).await;
    let tasks: Vec<Task> = body_json(resp).await;
    let ids: Vec<i64> = tasks.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[tokio::test]
async fn tasks_filter_by_status_priority_and_category() {
    let app = app();
    let work = seed_category(&app, "Travail").await;
    let home = seed_category(&app, "Maison").await;
    seed_task(&app, "Rapport", work.id, "en_cours", "haute").await;
    seed_task(&app, "Courses", home.id, "a_faire", "haute").await;
    seed_task(&app, "Ménage", home.id, "terminee", "faible").await;

    let resp = send(&app, empty_request("GET", "/api/tasks/?status=en_cours")).await;
    let tasks: Vec<Task> = body_json(resp).await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Rapport");

    let resp = send(&app, empty_request("GET", "/api/tasks/?priority=haute")).await;
    let tasks: Vec<Task> = body_json(resp).await;
    assert_eq!(tasks.len(), 2);

    let uri = format!("/api/tasks/?category={}", home.id);
    let resp = send(&app, empty_request("GET", &uri)).await;
    let tasks: Vec<Task> = body_json(resp).await;
    assert!(tasks.iter().all(|t| t.category.id == home.id));
    assert_eq!(tasks.len(), 2);
}

#[tokio::test]
async fn patch_changes_only_given_fields() {
    let app = app();
    let category = seed_category(&app, "Travail").await;
    let task = seed_task(&app, "Rapport", category.id, "a_faire", "moyenne").await;

    let uri = format!("/api/tasks/{}/", task.id);
    let resp = send(&app, json_request("PATCH", &uri, r#"{"status":"terminee"}"#)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Task = body_json(resp).await;
    assert_eq!(updated.status, Status::Terminee);
    assert_eq!(updated.title, "Rapport");
    assert_eq!(updated.priority, Priority::Moyenne);
}

#[tokio::test]
async fn unknown_status_value_is_rejected() {
    let app = app();
    let category = seed_category(&app, "Travail").await;
    let task = seed_task(&app, "Rapport", category.id, "a_faire", "moyenne").await;

    let uri = format!("/api/tasks/{}/", task.id);
    let resp = send(&app, json_request("PATCH", &uri, r#"{"status":"annule"}"#)).await;
    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn ids_are_counted_per_resource() {
    let app = app();
    let work = seed_category(&app, "Travail").await;
    let task = seed_task(&app, "Rapport", work.id, "a_faire", "haute").await;
    let home = seed_category(&app, "Maison").await;

    assert_eq!((work.id, task.id, home.id), (1, 1, 2));
}

#[tokio::test]
async fn null_image_path_removes_image() {
    let app = app();
    let category = seed_category(&app, "Travail").await;
    let body = format!(
        r#"{{"title":"Affiche","description":"","start_datetime":"2025-07-26T09:00:00Z",
            "end_datetime":"2025-07-26T11:00:00Z","image_path":"media/affiche.png",
            "category_id":{}}}"#,
        category.id
    );
    let resp = send(&app, json_request("POST", "/api/tasks/", &body)).await;
    let task: Task = body_json(resp).await;
    assert_eq!(task.image_path.as_deref(), Some("media/affiche.png"));

    let uri = format!("/api/tasks/{}/", task.id);
    let resp = send(&app, json_request("PATCH", &uri, r#"{"title":"Affiche A3"}"#)).await;
    let renamed: Task = body_json(resp).await;
    assert_eq!(renamed.image_path.as_deref(), Some("media/affiche.png"));

    let resp = send(&app, json_request("PATCH", &uri, r#"{"image_path":null}"#)).await;
    let cleared: Task = body_json(resp).await;
    assert!(cleared.image_path.is_none());
}

// --- subtasks ---

#[tokio::test]
async fn subtasks_filter_by_task_and_nest_in_task() {
    let app = app();
    let category = seed_category(&app, "Travail").await;
    let a = seed_task(&app, "API", category.id, "a_faire", "haute").await;
    let b = seed_task(&app, "UI", category.id, "a_faire", "haute").await;
    for (title, task_id) in [("Routes", a.id), ("Tests", a.id), ("Maquette", b.id)] {
        let body = format!(r#"{{"title":"{title}","task_id":{task_id}}}"#);
        let resp = send(&app, json_request("POST", "/api/subtasks/", &body)).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let uri = format!("/api/subtasks/?task={}", a.id);
    let resp = send(&app, empty_request("GET", &uri)).await;
    let subtasks: Vec<Subtask> = body_json(resp).await;
    assert_eq!(subtasks.len(), 2);
    assert!(subtasks.iter().all(|s| s.task_id == a.id && !s.is_done));

    let resp = send(&app, empty_request("GET", &format!("/api/tasks/{}/", a.id))).await;
    let task: Task = body_json(resp).await;
    assert_eq!(task.subtasks, subtasks);
}

#[tokio::test]
async fn subtask_for_missing_task_is_rejected() {
    let resp = send(
        &app(),
        json_request("POST", "/api/subtasks/", r#"{"title":"Routes","task_id":7}"#),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert!(body["task_id"].is_array());
}

#[tokio::test]
async fn delete_missing_subtask_returns_404() {
    let resp = send(&app(), empty_request("DELETE", "/api/subtasks/3/")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    let app = app();
    let category = seed_category(&app, "Travail").await;
    let task = seed_task(&app, "Rapport", category.id, "a_faire", "haute").await;

    let body = format!(r#"{{"title":"Relire","task_id":{}}}"#, task.id);
    let resp = send(&app, json_request("POST", "/api/subtasks/", &body)).await;
    let subtask: Subtask = body_json(resp).await;

    let uri = format!("/api/subtasks/{}/", subtask.id);
    let resp = send(&app, json_request("PATCH", &uri, r#"{"is_done":true}"#)).await;
    let done: Subtask = body_json(resp).await;
    assert!(done.is_done);
    assert_eq!(done.title, "Relire");

    let task_uri = format!("/api/tasks/{}/", task.id);
    let resp = send(&app, empty_request("DELETE", &task_uri)).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = send(&app, empty_request("GET", &uri)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = send(&app, empty_request("DELETE", &task_uri)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = send(&app, empty_request("GET", "/api/tasks/")).await;
    let tasks: Vec<Task> = body_json(resp).await;
    assert!(tasks.is_empty());
}
