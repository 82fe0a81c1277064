//! Domain DTOs for the taskmaster API.
//!
//! # Design
//! Read types (`Category`, `Task`, `Subtask`) mirror what the backend returns;
//! write types (`NewCategory`, `NewTask`, `TaskPatch`, ...) mirror what it
//! accepts. Patch types skip `None` fields so omitted fields stay unchanged on
//! the server. These types are defined independently from the mock-server
//! crate; integration tests catch schema drift.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub const CATEGORY_NAME_MAX: usize = 100;
pub const TASK_TITLE_MAX: usize = 200;
pub const SUBTASK_TITLE_MAX: usize = 200;

/// Anything the backend identifies by an integer primary key.
pub trait Entity {
    fn id(&self) -> i64;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Payload for creating or renaming a category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    AFaire,
    EnCours,
    Terminee,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::AFaire, TaskStatus::EnCours, TaskStatus::Terminee];

    /// Wire value, also used as a query-string parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::AFaire => "a_faire",
            TaskStatus::EnCours => "en_cours",
            TaskStatus::Terminee => "terminee",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::AFaire => "À faire",
            TaskStatus::EnCours => "En cours",
            TaskStatus::Terminee => "Terminée",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Faible,
    #[default]
    Moyenne,
    Haute,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [TaskPriority::Faible, TaskPriority::Moyenne, TaskPriority::Haute];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskPriority::Faible => "faible",
            TaskPriority::Moyenne => "moyenne",
            TaskPriority::Haute => "haute",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskPriority::Faible => "Faible",
            TaskPriority::Moyenne => "Moyenne",
            TaskPriority::Haute => "Haute",
        }
    }
}

/// A task as returned by the backend.
///
/// `category` is normally nested. Some serializers send only the foreign key;
/// in that case the name is left empty until a view fills it in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(deserialize_with = "category_ref")]
    pub category: Category,
    #[serde(default)]
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

/// Payload for creating a task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub category_id: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub image_path: Option<String>,
}

/// Partial task update. Only the fields present are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_datetime: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_datetime: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    /// `Some(None)` is sent as `null` and removes the image.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "nullable")]
    pub image_path: Option<Option<String>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subtask {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub is_done: bool,
    #[serde(alias = "task")]
    pub task_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewSubtask {
    pub title: String,
    pub task_id: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubtaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_done: Option<bool>,
}

impl Entity for Category {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Entity for Task {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Entity for Subtask {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Keep an explicit `null` apart from an absent field.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn category_ref<'de, D>(deserializer: D) -> Result<Category, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum CategoryRef {
        Nested(Category),
        Id(i64),
    }

    Ok(match CategoryRef::deserialize(deserializer)? {
        CategoryRef::Nested(category) => category,
        CategoryRef::Id(id) => Category {
            id,
            name: String::new(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TASK_JSON: &str = r#"{
        "id": 3,
        "title": "Créer l'API REST",
        "description": "Endpoints CRUD",
        "start_datetime": "2025-07-25T09:00:00Z",
        "end_datetime": "2025-07-25T12:00:00Z",
        "status": "en_cours",
        "priority": "haute",
        "category": {"id": 4, "name": "Développement"},
        "image_path": null,
        "created_at": "2025-07-20T08:30:00.123456Z",
        "subtasks": [{"id": 2, "title": "Routes", "is_done": false, "task": 3}]
    }"#;

    #[test]
    fn task_deserializes_nested_category_and_subtasks() {
        let task: Task = serde_json::from_str(TASK_JSON).unwrap();
        assert_eq!(task.status, TaskStatus::EnCours);
        assert_eq!(task.priority, TaskPriority::Haute);
        assert_eq!(task.category.name, "Développement");
        assert_eq!(task.subtasks.len(), 1);
        assert_eq!(task.subtasks[0].task_id, 3);
        assert!(task.image_path.is_none());
    }

    #[test]
    fn task_accepts_bare_category_id() {
        let json = TASK_JSON.replace(r#"{"id": 4, "name": "Développement"}"#, "4");
        let task: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(task.category.id, 4);
        assert!(task.category.name.is_empty());
    }

    #[test]
    fn task_without_subtasks_field_defaults_to_empty() {
        let json = TASK_JSON.replace(
            r#""subtasks": [{"id": 2, "title": "Routes", "is_done": false, "task": 3}]"#,
            r#""subtasks": []"#,
        );
        let task: Task = serde_json::from_str(&json).unwrap();
        assert!(task.subtasks.is_empty());
    }

    #[test]
    fn status_and_priority_use_wire_names() {
        assert_eq!(serde_json::to_value(TaskStatus::Terminee).unwrap(), "terminee");
        assert_eq!(serde_json::to_value(TaskPriority::Faible).unwrap(), "faible");
        let status: TaskStatus = serde_json::from_str(r#""a_faire""#).unwrap();
        assert_eq!(status, TaskStatus::AFaire);
        assert!(serde_json::from_str::<TaskStatus>(r#""annule""#).is_err());
    }

    #[test]
    fn defaults_match_backend_model() {
        assert_eq!(TaskStatus::default(), TaskStatus::AFaire);
        assert_eq!(TaskPriority::default(), TaskPriority::Moyenne);
    }

    #[test]
    fn task_patch_skips_absent_fields() {
        let patch = TaskPatch {
            status: Some(TaskStatus::Terminee),
            ..TaskPatch::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"status": "terminee"}));
        assert!(!patch.is_empty());
        assert!(TaskPatch::default().is_empty());
    }

    #[test]
    fn task_patch_sends_null_to_clear_image() {
        let patch = TaskPatch {
            image_path: Some(None),
            ..TaskPatch::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"image_path": null}));

        let read: TaskPatch = serde_json::from_value(json).unwrap();
        assert_eq!(read.image_path, Some(None));
        let absent: TaskPatch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.image_path, None);
    }

    #[test]
    fn subtask_reads_task_id_under_either_name() {
        let a: Subtask = serde_json::from_str(r#"{"id":1,"title":"a","is_done":true,"task_id":9}"#).unwrap();
        let b: Subtask = serde_json::from_str(r#"{"id":1,"title":"a","is_done":true,"task":9}"#).unwrap();
        assert_eq!(a, b);
    }
}
