use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};

use crate::form::{
    remaining_chars, required, run_submission, truncate_chars, FormError, InputZone, SubmitState,
};
use crate::types::{NewTask, Task, TaskPatch, TaskPriority, TaskStatus, TASK_TITLE_MAX};

/// What a task form asks to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskDraft {
    Create(NewTask),
    Update { id: i64, patch: TaskPatch },
}

/// Create or edit a task.
///
/// `start` and `end` hold what a `datetime-local` input produces
/// (`2025-07-26T09:00`); they are read in the form's zone and sent as UTC.
/// When editing, a date whose text was left as prefilled keeps its stored
/// instant and is not sent.
#[derive(Debug, Clone)]
pub struct TaskForm {
    title: String,
    pub description: String,
    pub start: String,
    pub end: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub category_id: Option<i64>,
    pub image_path: Option<String>,
    zone: InputZone,
    editing: Option<Editing>,
    state: SubmitState,
}

/// The task being edited and its dates as prefilled.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Editing {
    id: i64,
    start: (String, DateTime<Utc>),
    end: (String, DateTime<Utc>),
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::with_zone(InputZone::Local)
    }
}

impl TaskForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zone(zone: InputZone) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            start: String::new(),
            end: String::new(),
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            category_id: None,
            image_path: None,
            zone,
            editing: None,
            state: SubmitState::Idle,
        }
    }

    /// Empty form reading date inputs at a fixed `offset`.
    pub fn with_offset(offset: FixedOffset) -> Self {
        Self::with_zone(InputZone::Fixed(offset))
    }

    /// Form prefilled from an existing task.
    pub fn edit(task: &Task, zone: impl Into<InputZone>) -> Self {
        let mut form = Self::with_zone(zone.into());
        form.set_title(&task.title);
        form.description = task.description.clone();
        form.start = form.zone.format(&task.start_datetime);
        form.end = form.zone.format(&task.end_datetime);
        form.status = task.status;
        form.priority = task.priority;
        form.category_id = Some(task.category.id);
        form.image_path = task.image_path.clone();
        form.editing = Some(Editing {
            id: task.id,
            start: (form.start.clone(), task.start_datetime),
            end: (form.end.clone(), task.end_datetime),
        });
        form
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, value: &str) {
        self.title = truncate_chars(value, TASK_TITLE_MAX);
    }

    pub fn remaining(&self) -> usize {
        remaining_chars(&self.title, TASK_TITLE_MAX)
    }

    pub fn editing(&self) -> Option<i64> {
        self.editing.as_ref().map(|editing| editing.id)
    }

    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    pub fn validate(&self) -> Result<TaskDraft, FormError> {
        let title = required(&self.title, "title")?;
        let prefilled = self.editing.as_ref();
        let (start, start_changed) = self.read_date(&self.start, prefilled.map(|e| &e.start), "start date")?;
        let (end, end_changed) = self.read_date(&self.end, prefilled.map(|e| &e.end), "end date")?;
        if start > end {
            return Err(FormError::DateOrder);
        }
        let image_path = self
            .image_path
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .map(str::to_string);

        match prefilled {
            Some(editing) => Ok(TaskDraft::Update {
                id: editing.id,
                patch: TaskPatch {
                    title: Some(title),
                    description: Some(self.description.clone()),
                    start_datetime: start_changed.then_some(start),
                    end_datetime: end_changed.then_some(end),
                    status: Some(self.status),
                    priority: Some(self.priority),
                    category_id: self.category_id,
                    image_path: Some(image_path),
                },
            }),
            None => Ok(TaskDraft::Create(NewTask {
                title,
                description: self.description.clone(),
                start_datetime: start,
                end_datetime: end,
                status: self.status,
                priority: self.priority,
                category_id: self.category_id.ok_or(FormError::Required("category"))?,
                image_path,
            })),
        }
    }

    pub fn submit<R, E: fmt::Display>(
        &mut self,
        persist: impl FnOnce(TaskDraft) -> Result<R, E>,
    ) -> Result<R, FormError> {
        let validated = self.validate();
        let message = if self.editing.is_some() {
            "Task updated"
        } else {
            "Task created"
        };
        let result = run_submission(&mut self.state, validated, persist, message);
        if result.is_ok() {
            self.clear();
        }
        result
    }

    /// The instant for `text`, and whether it differs from the prefilled one.
    fn read_date(
        &self,
        text: &str,
        prefilled: Option<&(String, DateTime<Utc>)>,
        field: &'static str,
    ) -> Result<(DateTime<Utc>, bool), FormError> {
        match prefilled {
            Some((shown, stored)) if shown == text => Ok((*stored, false)),
            _ => Ok((self.zone.parse(text, field)?, true)),
        }
    }

    fn clear(&mut self) {
        let state = std::mem::take(&mut self.state);
        *self = Self {
            state,
            ..Self::with_zone(self.zone)
        };
    }
}
