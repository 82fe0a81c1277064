//! Client core for the taskmaster task-management API.
//!
//! # Overview
//! Typed access to a Django-style REST backend holding categories, tasks and
//! subtasks, plus the view state a front end keeps on top of it.
//!
//! # Design
//! - `ApiClient` builds `HttpRequest` values and parses `HttpResponse` values
//!   without touching the network (host-does-IO pattern). A `Transport`
//!   performs the round-trip; `UreqTransport` is the blocking default.
//! - `services` pair the two per entity and return plain `Result`s.
//! - `view` containers own one list each, apply filters and sorting, and
//!   patch their list only after the server confirmed a mutation.
//! - `form` validates input before anything is sent.
//! - `settings` persists the sidebar and theme preferences.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod http;
pub mod notice;
pub mod services;
pub mod settings;
pub mod transport;
pub mod types;
pub mod view;

#[cfg(test)]
mod test_support;

pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use services::{CategoryService, SubtaskService, TaskService};
pub use transport::{Transport, UreqTransport};
pub use types::{
    Category, NewCategory, NewSubtask, NewTask, Subtask, SubtaskPatch, Task, TaskPatch, TaskPriority,
    TaskStatus,
};
pub use view::{CategoryList, SubtaskList, TaskBoard, ViewError};
