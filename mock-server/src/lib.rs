//! In-memory stand-in for the taskmaster REST backend.
//!
//! Mirrors what the client relies on from the Django REST Framework service:
//! trailing-slash routes under `/api`, `201` on create, `204` on delete,
//! `{"detail": "Not found."}` for missing ids, field-error bodies for invalid
//! input, tasks newest first with a nested category, and cascading deletes.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    AFaire,
    EnCours,
    Terminee,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Faible,
    #[default]
    Moyenne,
    Haute,
}

impl Status {
    fn as_str(self) -> &'static str {
        match self {
            Status::AFaire => "a_faire",
            Status::EnCours => "en_cours",
            Status::Terminee => "terminee",
        }
    }
}

impl Priority {
    fn as_str(self) -> &'static str {
        match self {
            Priority::Faible => "faible",
            Priority::Moyenne => "moyenne",
            Priority::Haute => "haute",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: i64,
    pub title: String,
    pub is_done: bool,
    pub task_id: i64,
}

/// A task as stored: the category is a foreign key.
#[derive(Clone, Debug)]
struct TaskRow {
    id: i64,
    title: String,
    description: String,
    start_datetime: DateTime<Utc>,
    end_datetime: DateTime<Utc>,
    image_path: Option<String>,
    status: Status,
    priority: Priority,
    category_id: i64,
    created_at: DateTime<Utc>,
}

/// A task as served: category and subtasks nested.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub image_path: Option<String>,
    pub status: Status,
    pub priority: Priority,
    pub category: Category,
    pub created_at: DateTime<Utc>,
    pub subtasks: Vec<Subtask>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryInput {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TaskInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_datetime: Option<DateTime<Utc>>,
    pub end_datetime: Option<DateTime<Utc>>,
    /// `Some(None)` when the body sends `null`.
    #[serde(default, deserialize_with = "nullable")]
    pub image_path: Option<Option<String>>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub category_id: Option<i64>,
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize)]
pub struct SubtaskInput {
    pub title: Option<String>,
    pub is_done: Option<bool>,
    #[serde(alias = "task")]
    pub task_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TaskFilter {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<i64>,
}

#[derive(Debug, Default)]
pub struct Store {
    categories: BTreeMap<i64, Category>,
    tasks: BTreeMap<i64, TaskRow>,
    subtasks: BTreeMap<i64, Subtask>,
    last_ids: LastIds,
}

/// Auto-increment state, one sequence per table.
#[derive(Debug, Default)]
struct LastIds {
    category: i64,
    task: i64,
    subtask: i64,
}

fn next_id(last: &mut i64) -> i64 {
    *last += 1;
    *last
}

impl Store {
    fn render(&self, row: &TaskRow) -> Task {
        let category = self.categories.get(&row.category_id).cloned().unwrap_or(Category {
            id: row.category_id,
            name: String::new(),
        });
        Task {
            id: row.id,
            title: row.title.clone(),
            description: row.description.clone(),
            start_datetime: row.start_datetime,
            end_datetime: row.end_datetime,
            image_path: row.image_path.clone(),
            status: row.status,
            priority: row.priority,
            category,
            created_at: row.created_at,
            subtasks: self
                .subtasks
                .values()
                .filter(|subtask| subtask.task_id == row.id)
                .cloned()
                .collect(),
        }
    }

    fn delete_task(&mut self, id: i64) -> bool {
        self.subtasks.retain(|_, subtask| subtask.task_id != id);
        self.tasks.remove(&id).is_some()
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Error response in the shape DRF produces.
#[derive(Debug)]
pub struct ApiError(StatusCode, Value);

impl ApiError {
    fn not_found() -> Self {
        ApiError(StatusCode::NOT_FOUND, json!({"detail": "Not found."}))
    }

    fn field(field: &str, message: &str) -> Self {
        ApiError(StatusCode::BAD_REQUEST, json!({ field: [message] }))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(self.1)).into_response()
    }
}

const REQUIRED: &str = "This field is required.";
const BLANK: &str = "This field may not be blank.";

fn required_text(field: &str, value: Option<String>) -> Result<String, ApiError> {
    match value {
        None => Err(ApiError::field(field, REQUIRED)),
        Some(text) => non_blank(field, text),
    }
}

fn non_blank(field: &str, text: String) -> Result<String, ApiError> {
    if text.trim().is_empty() {
        Err(ApiError::field(field, BLANK))
    } else {
        Ok(text)
    }
}

fn max_length(field: &str, text: &str, max: usize) -> Result<(), ApiError> {
    if text.chars().count() > max {
        let message = format!("Ensure this field has no more than {max} characters.");
        return Err(ApiError::field(field, &message));
    }
    Ok(())
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    let api = Router::new()
        .route("/categories/", get(list_categories).post(create_category))
        .route(
            "/categories/{id}/",
            get(get_category)
                .put(update_category)
                .patch(update_category)
                .delete(delete_category),
        )
        .route("/tasks/", get(list_tasks).post(create_task))
        .route(
            "/tasks/{id}/",
            get(get_task).put(update_task).patch(update_task).delete(delete_task),
        )
        .route("/subtasks/", get(list_subtasks).post(create_subtask))
        .route(
            "/subtasks/{id}/",
            get(get_subtask)
                .put(update_subtask)
                .patch(update_subtask)
                .delete(delete_subtask),
        )
        .with_state(db);
    Router::new().nest("/api", api).layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// --- categories ---

async fn list_categories(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<Category>> {
    let store = db.read().await;
    let needle = params.get("search").map(|q| q.to_lowercase()).unwrap_or_default();
    Json(
        store
            .categories
            .values()
            .filter(|category| category.name.to_lowercase().contains(&needle))
            .cloned()
            .collect(),
    )
}

async fn create_category(
    State(db): State<Db>,
    Json(input): Json<CategoryInput>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let name = required_text("name", input.name)?;
    max_length("name", &name, 100)?;
    let mut store = db.write().await;
    let category = Category {
        id: next_id(&mut store.last_ids.category),
        name,
    };
    store.categories.insert(category.id, category.clone());
    Ok((StatusCode::CREATED, Json(category)))
}

async fn get_category(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Category>, ApiError> {
    let store = db.read().await;
    store.categories.get(&id).cloned().map(Json).ok_or_else(ApiError::not_found)
}

async fn update_category(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<CategoryInput>,
) -> Result<Json<Category>, ApiError> {
    let mut store = db.write().await;
    let category = store.categories.get_mut(&id).ok_or_else(ApiError::not_found)?;
    if let Some(name) = input.name {
        let name = non_blank("name", name)?;
        max_length("name", &name, 100)?;
        category.name = name;
    }
    Ok(Json(category.clone()))
}

/// Deleting a category removes its tasks and their subtasks.
async fn delete_category(State(db): State<Db>, Path(id): Path<i64>) -> Result<StatusCode, ApiError> {
    let mut store = db.write().await;
    store.categories.remove(&id).ok_or_else(ApiError::not_found)?;
    let orphaned: Vec<i64> = store
        .tasks
        .values()
        .filter(|task| task.category_id == id)
        .map(|task| task.id)
        .collect();
    for task_id in orphaned {
        store.delete_task(task_id);
    }
    Ok(StatusCode::NO_CONTENT)
}

// --- tasks ---

async fn list_tasks(State(db): State<Db>, Query(filter): Query<TaskFilter>) -> Json<Vec<Task>> {
    let store = db.read().await;
    let mut rows: Vec<&TaskRow> = store
        .tasks
        .values()
        .filter(|row| filter.status.as_deref().map_or(true, |s| row.status.as_str() == s))
        .filter(|row| filter.priority.as_deref().map_or(true, |p| row.priority.as_str() == p))
        .filter(|row| filter.category.map_or(true, |c| row.category_id == c))
        .collect();
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    Json(rows.into_iter().map(|row| store.render(row)).collect())
}

async fn create_task(
    State(db): State<Db>,
    Json(input): Json<TaskInput>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let title = required_text("title", input.title)?;
    max_length("title", &title, 200)?;
    let description = input.description.ok_or_else(|| ApiError::field("description", REQUIRED))?;
    let start_datetime = input
        .start_datetime
        .ok_or_else(|| ApiError::field("start_datetime", REQUIRED))?;
    let end_datetime = input
        .end_datetime
        .ok_or_else(|| ApiError::field("end_datetime", REQUIRED))?;
    let category_id = input
        .category_id
        .ok_or_else(|| ApiError::field("category_id", REQUIRED))?;

    let mut store = db.write().await;
    if !store.categories.contains_key(&category_id) {
        let message = format!("Invalid pk \"{category_id}\" - object does not exist.");
        return Err(ApiError::field("category_id", &message));
    }
    let row = TaskRow {
        id: next_id(&mut store.last_ids.task),
        title,
        description,
        start_datetime,
        end_datetime,
        image_path: input.image_path.flatten(),
        status: input.status.unwrap_or_default(),
        priority: input.priority.unwrap_or_default(),
        category_id,
        created_at: Utc::now(),
    };
    let task = store.render(&row);
    store.tasks.insert(row.id, row);
    Ok((StatusCode::CREATED, Json(task)))
}

async fn get_task(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Task>, ApiError> {
    let store = db.read().await;
    let row = store.tasks.get(&id).ok_or_else(ApiError::not_found)?;
    Ok(Json(store.render(row)))
}

/// Partial update: only the fields present are applied.
async fn update_task(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<TaskInput>,
) -> Result<Json<Task>, ApiError> {
    let mut store = db.write().await;
    if let Some(category_id) = input.category_id {
        if !store.categories.contains_key(&category_id) {
            let message = format!("Invalid pk \"{category_id}\" - object does not exist.");
            return Err(ApiError::field("category_id", &message));
        }
    }
    let row = store.tasks.get_mut(&id).ok_or_else(ApiError::not_found)?;
    if let Some(title) = input.title {
        let title = non_blank("title", title)?;
        max_length("title", &title, 200)?;
        row.title = title;
    }
    if let Some(description) = input.description {
        row.description = description;
    }
    if let Some(start) = input.start_datetime {
        row.start_datetime = start;
    }
    if let Some(end) = input.end_datetime {
        row.end_datetime = end;
    }
    if let Some(image_path) = input.image_path {
        row.image_path = image_path;
    }
    if let Some(status) = input.status {
        row.status = status;
    }
    if let Some(priority) = input.priority {
        row.priority = priority;
    }
    if let Some(category_id) = input.category_id {
        row.category_id = category_id;
    }
    let row = row.clone();
    Ok(Json(store.render(&row)))
}

async fn delete_task(State(db): State<Db>, Path(id): Path<i64>) -> Result<StatusCode, ApiError> {
    let mut store = db.write().await;
    if store.delete_task(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found())
    }
}

// --- subtasks ---

async fn list_subtasks(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<Subtask>> {
    let store = db.read().await;
    let task = params.get("task").and_then(|t| t.parse::<i64>().ok());
    Json(
        store
            .subtasks
            .values()
            .filter(|subtask| task.map_or(true, |id| subtask.task_id == id))
            .cloned()
            .collect(),
    )
}

async fn create_subtask(
    State(db): State<Db>,
    Json(input): Json<SubtaskInput>,
) -> Result<(StatusCode, Json<Subtask>), ApiError> {
    let title = required_text("title", input.title)?;
    max_length("title", &title, 200)?;
    let task_id = input.task_id.ok_or_else(|| ApiError::field("task_id", REQUIRED))?;

    let mut store = db.write().await;
    if !store.tasks.contains_key(&task_id) {
        let message = format!("Invalid pk \"{task_id}\" - object does not exist.");
        return Err(ApiError::field("task_id", &message));
    }
    let subtask = Subtask {
        id: next_id(&mut store.last_ids.subtask),
        title,
        is_done: input.is_done.unwrap_or(false),
        task_id,
    };
    store.subtasks.insert(subtask.id, subtask.clone());
    Ok((StatusCode::CREATED, Json(subtask)))
}

async fn get_subtask(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Subtask>, ApiError> {
    let store = db.read().await;
    store.subtasks.get(&id).cloned().map(Json).ok_or_else(ApiError::not_found)
}

async fn update_subtask(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<SubtaskInput>,
) -> Result<Json<Subtask>, ApiError> {
    let mut store = db.write().await;
    let subtask = store.subtasks.get_mut(&id).ok_or_else(ApiError::not_found)?;
    if let Some(title) = input.title {
        let title = non_blank("title", title)?;
        max_length("title", &title, 200)?;
        subtask.title = title;
    }
    if let Some(is_done) = input.is_done {
        subtask.is_done = is_done;
    }
    Ok(Json(subtask.clone()))
}

async fn delete_subtask(State(db): State<Db>, Path(id): Path<i64>) -> Result<StatusCode, ApiError> {
    let mut store = db.write().await;
    store
        .subtasks
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(ApiError::not_found)
}
