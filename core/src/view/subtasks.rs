use std::time::Instant;

use crate::form::{required, truncate_chars};
use crate::services::SubtaskService;
use crate::transport::Transport;
use crate::types::{NewSubtask, Subtask, SubtaskPatch, SUBTASK_TITLE_MAX};
use crate::view::{ListState, LoadState, ViewError};

/// Checklist of the subtasks belonging to one task.
#[derive(Debug)]
pub struct SubtaskList<T> {
    service: SubtaskService<T>,
    task_id: i64,
    list: ListState<Subtask>,
}

impl<T: Transport> SubtaskList<T> {
    pub fn new(service: SubtaskService<T>, task_id: i64) -> Self {
        Self {
            service,
            task_id,
            list: ListState::default(),
        }
    }

    pub fn task_id(&self) -> i64 {
        self.task_id
    }

    pub fn load(&mut self) -> Result<(), ViewError> {
        self.list.begin_load();
        let fetched = self.service.get_by_task(self.task_id);
        self.list.finish_load("subtasks", fetched)
    }

    pub fn retry(&mut self) -> Result<(), ViewError> {
        self.load()
    }

    pub fn state(&self) -> &LoadState {
        self.list.load_state()
    }

    pub fn items(&self) -> &[Subtask] {
        self.list.items()
    }

    /// `(done, total)`.
    pub fn progress(&self) -> (usize, usize) {
        let items = self.list.items();
        (items.iter().filter(|s| s.is_done).count(), items.len())
    }

    /// Create a subtask. One created for another task is not listed here.
    pub fn add(&mut self, input: &NewSubtask) -> Result<Subtask, ViewError> {
        self.list.ensure_ready()?;
        let created = self.list.check("add subtask", self.service.create(input))?;
        if created.task_id == self.task_id {
            self.list.push(created.clone());
        }
        self.list.succeed("Subtask added");
        Ok(created)
    }

    /// Flip `is_done` through the service's read-then-write toggle.
    pub fn toggle(&mut self, id: i64) -> Result<Subtask, ViewError> {
        self.list.ensure_ready()?;
        let toggled = self.list.check("toggle subtask", self.service.toggle_status(id))?;
        self.list.replace(toggled.clone());
        self.list.succeed(if toggled.is_done {
            "Subtask completed"
        } else {
            "Subtask reopened"
        });
        Ok(toggled)
    }

    /// Rename with the same rules as the subtask form: required, and cut to
    /// the title limit.
    pub fn rename(&mut self, id: i64, title: &str) -> Result<Subtask, ViewError> {
        self.list.ensure_ready()?;
        let title = required(&truncate_chars(title, SUBTASK_TITLE_MAX), "title")?;
        let patch = SubtaskPatch {
            title: Some(title),
            ..SubtaskPatch::default()
        };
        let updated = self.list.check("rename subtask", self.service.update(id, &patch))?;
        self.list.replace(updated.clone());
        self.list.succeed("Subtask updated");
        Ok(updated)
    }

    pub fn delete(&mut self, id: i64) -> Result<(), ViewError> {
        self.list.ensure_ready()?;
        match self.service.delete(id) {
            Ok(()) => {}
            Err(err) if err.is_not_found() => {
                tracing::debug!(id, "subtask already gone");
            }
            Err(err) => return Err(self.list.fail("delete subtask", err)),
        }
        self.list.remove(id);
        self.list.succeed("Subtask deleted");
        Ok(())
    }

    pub fn error(&self) -> Option<&str> {
        self.list.error()
    }

    pub fn dismiss_error(&mut self) {
        self.list.dismiss_error();
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice_at(Instant::now())
    }

    pub fn notice_at(&self, now: Instant) -> Option<&str> {
        self.list.notice_at(now)
    }
}
