//! Stateless HTTP request builder and response parser for the taskmaster API.
//!
//! # Design
//! `ApiClient` holds only a `base_url`. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method that
//! consumes an `HttpResponse`; the services in `services/` glue the two
//! together through a `Transport`. Routes follow the Django REST Framework
//! convention of a trailing slash on every resource path.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    Category, NewCategory, NewSubtask, NewTask, Subtask, SubtaskPatch, Task, TaskPatch,
    TaskPriority, TaskStatus,
};

/// Synchronous, stateless client for the taskmaster API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // --- categories ---

    pub fn build_list_categories(&self) -> HttpRequest {
        self.get(collection("categories"))
    }

    pub fn build_get_category(&self, id: i64) -> HttpRequest {
        self.get(member("categories", id))
    }

    pub fn build_create_category(&self, input: &NewCategory) -> Result<HttpRequest, ApiError> {
        self.with_body(HttpMethod::Post, collection("categories"), input)
    }

    pub fn build_update_category(&self, id: i64, input: &NewCategory) -> Result<HttpRequest, ApiError> {
        self.with_body(HttpMethod::Put, member("categories", id), input)
    }

    pub fn build_delete_category(&self, id: i64) -> HttpRequest {
        self.delete(member("categories", id))
    }

    pub fn build_search_categories(&self, query: &str) -> HttpRequest {
        self.get(filtered("categories", "search", query))
    }

    pub fn parse_list_categories(&self, response: HttpResponse) -> Result<Vec<Category>, ApiError> {
        parse_json(response, "failed to load categories")
    }

    pub fn parse_get_category(&self, response: HttpResponse) -> Result<Category, ApiError> {
        parse_json(response, "category not found")
    }

    pub fn parse_create_category(&self, response: HttpResponse) -> Result<Category, ApiError> {
        parse_json(response, "failed to create category")
    }

    pub fn parse_update_category(&self, response: HttpResponse) -> Result<Category, ApiError> {
        parse_json(response, "failed to update category")
    }

    pub fn parse_delete_category(&self, response: HttpResponse) -> Result<(), ApiError> {
        parse_empty(response, "failed to delete category")
    }

    pub fn parse_search_categories(&self, response: HttpResponse) -> Result<Vec<Category>, ApiError> {
        parse_json(response, "failed to search categories")
    }

    // --- tasks ---

    pub fn build_list_tasks(&self) -> HttpRequest {
        self.get(collection("tasks"))
    }

    pub fn build_get_task(&self, id: i64) -> HttpRequest {
        self.get(member("tasks", id))
    }

    pub fn build_create_task(&self, input: &NewTask) -> Result<HttpRequest, ApiError> {
        self.with_body(HttpMethod::Post, collection("tasks"), input)
    }

    pub fn build_update_task(&self, id: i64, input: &TaskPatch) -> Result<HttpRequest, ApiError> {
        self.with_body(HttpMethod::Patch, member("tasks", id), input)
    }

    pub fn build_update_task_status(&self, id: i64, status: TaskStatus) -> Result<HttpRequest, ApiError> {
        let patch = TaskPatch {
            status: Some(status),
            ..TaskPatch::default()
        };
        self.build_update_task(id, &patch)
    }

    pub fn build_delete_task(&self, id: i64) -> HttpRequest {
        self.delete(member("tasks", id))
    }

    pub fn build_filter_tasks_by_status(&self, status: TaskStatus) -> HttpRequest {
        self.get(filtered("tasks", "status", status.as_str()))
    }

    pub fn build_filter_tasks_by_priority(&self, priority: TaskPriority) -> HttpRequest {
        self.get(filtered("tasks", "priority", priority.as_str()))
    }

    pub fn build_filter_tasks_by_category(&self, category_id: i64) -> HttpRequest {
        self.get(filtered("tasks", "category", &category_id.to_string()))
    }

    pub fn parse_list_tasks(&self, response: HttpResponse) -> Result<Vec<Task>, ApiError> {
        parse_json(response, "failed to load tasks")
    }

    pub fn parse_get_task(&self, response: HttpResponse) -> Result<Task, ApiError> {
        parse_json(response, "task not found")
    }

    pub fn parse_create_task(&self, response: HttpResponse) -> Result<Task, ApiError> {
        parse_json(response, "failed to create task")
    }

    pub fn parse_update_task(&self, response: HttpResponse) -> Result<Task, ApiError> {
        parse_json(response, "failed to update task")
    }

    pub fn parse_update_task_status(&self, response: HttpResponse) -> Result<Task, ApiError> {
        parse_json(response, "failed to change task status")
    }

    pub fn parse_delete_task(&self, response: HttpResponse) -> Result<(), ApiError> {
        parse_empty(response, "failed to delete task")
    }

    pub fn parse_filter_tasks(&self, response: HttpResponse) -> Result<Vec<Task>, ApiError> {
        parse_json(response, "failed to filter tasks")
    }

    // --- subtasks ---

    pub fn build_list_subtasks(&self, task_id: i64) -> HttpRequest {
        self.get(filtered("subtasks", "task", &task_id.to_string()))
    }

    pub fn build_get_subtask(&self, id: i64) -> HttpRequest {
        self.get(member("subtasks", id))
    }

    pub fn build_create_subtask(&self, input: &NewSubtask) -> Result<HttpRequest, ApiError> {
        self.with_body(HttpMethod::Post, collection("subtasks"), input)
    }

    pub fn build_update_subtask(&self, id: i64, input: &SubtaskPatch) -> Result<HttpRequest, ApiError> {
        self.with_body(HttpMethod::Patch, member("subtasks", id), input)
    }

    pub fn build_delete_subtask(&self, id: i64) -> HttpRequest {
        self.delete(member("subtasks", id))
    }

    pub fn parse_list_subtasks(&self, response: HttpResponse) -> Result<Vec<Subtask>, ApiError> {
        parse_json(response, "failed to load subtasks")
    }

    pub fn parse_get_subtask(&self, response: HttpResponse) -> Result<Subtask, ApiError> {
        parse_json(response, "subtask not found")
    }

    pub fn parse_create_subtask(&self, response: HttpResponse) -> Result<Subtask, ApiError> {
        parse_json(response, "failed to create subtask")
    }

    pub fn parse_update_subtask(&self, response: HttpResponse) -> Result<Subtask, ApiError> {
        parse_json(response, "failed to update subtask")
    }

    pub fn parse_delete_subtask(&self, response: HttpResponse) -> Result<(), ApiError> {
        parse_empty(response, "failed to delete subtask")
    }

    /// Parses both halves of a toggle (the read and the write).
    pub fn parse_toggle_subtask(&self, response: HttpResponse) -> Result<Subtask, ApiError> {
        parse_json(response, "failed to toggle subtask")
    }

    // --- request helpers ---

    fn get(&self, path: String) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{path}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn delete(&self, path: String) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}{path}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn with_body<T: Serialize>(&self, method: HttpMethod, path: String, input: &T) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: json_headers(),
            body: Some(body),
        })
    }
}

fn collection(resource: &str) -> String {
    format!("/{resource}/")
}

fn member(resource: &str, id: i64) -> String {
    format!("/{resource}/{id}/")
}

fn filtered(resource: &str, key: &str, value: &str) -> String {
    format!("/{resource}/?{key}={}", encode_query_value(value))
}

fn json_headers() -> Vec<(String, String)> {
    vec![
        ("content-type".to_string(), "application/json".to_string()),
        ("accept".to_string(), "application/json".to_string()),
    ]
}

/// Percent-encode a query value, leaving RFC 3986 unreserved characters as is.
fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Map a non-2xx response to `ApiError`, using `fallback` when the body has
/// no message.
fn check_status(response: &HttpResponse, fallback: &str) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::from_status(response.status, &response.body, fallback))
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse, fallback: &str) -> Result<T, ApiError> {
    check_status(&response, fallback)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

fn parse_empty(response: HttpResponse, fallback: &str) -> Result<(), ApiError> {
    check_status(&response, fallback)
}
