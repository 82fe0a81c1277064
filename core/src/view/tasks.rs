use std::cmp::Reverse;
use std::time::Instant;

use crate::form::TaskDraft;
use crate::services::{CategoryService, TaskService};
use crate::transport::Transport;
use crate::types::{Category, NewTask, Task, TaskPatch, TaskPriority, TaskStatus};
use crate::view::{ListState, LoadState, ViewError};

/// Status tab above the task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusTab {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusTab {
    fn admits(self, status: TaskStatus) -> bool {
        match self {
            StatusTab::All => true,
            StatusTab::Only(wanted) => wanted == status,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskSort {
    /// Most recently created first, the backend's own order.
    #[default]
    Newest,
    StartDate,
    EndDate,
    /// `haute` first, ties broken by start date.
    Priority,
}

/// Tab badge counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub all: usize,
    pub a_faire: usize,
    pub en_cours: usize,
    pub terminee: usize,
}

/// Task list with status tabs, category/priority filters and search.
///
/// Loads the categories alongside the tasks so the category filter and task
/// cards can show names.
#[derive(Debug)]
pub struct TaskBoard<T> {
    tasks: TaskService<T>,
    category_service: CategoryService<T>,
    list: ListState<Task>,
    categories: Vec<Category>,
    pub tab: StatusTab,
    pub category: Option<i64>,
    pub priority: Option<TaskPriority>,
    pub search: String,
    pub sort: TaskSort,
}

impl<T: Transport> TaskBoard<T> {
    pub fn new(tasks: TaskService<T>, categories: CategoryService<T>) -> Self {
        Self {
            tasks,
            category_service: categories,
            list: ListState::default(),
            categories: Vec::new(),
            tab: StatusTab::default(),
            category: None,
            priority: None,
            search: String::new(),
            sort: TaskSort::default(),
        }
    }

    /// Fetch tasks and categories. Either failing fails the whole load.
    pub fn load(&mut self) -> Result<(), ViewError> {
        self.list.begin_load();
        let fetched = self.tasks.get_all().and_then(|tasks| {
            let categories = self.category_service.get_all()?;
            Ok((tasks, categories))
        });
        let tasks = match fetched {
            Ok((tasks, categories)) => {
                self.categories = categories;
                Ok(tasks)
            }
            Err(err) => Err(err),
        };
        self.list.finish_load("tasks", tasks)?;
        self.fill_category_names();
        Ok(())
    }

    pub fn retry(&mut self) -> Result<(), ViewError> {
        self.load()
    }

    pub fn state(&self) -> &LoadState {
        self.list.load_state()
    }

    pub fn items(&self) -> &[Task] {
        self.list.items()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category_name(&self, id: i64) -> Option<&str> {
        self.categories
            .iter()
            .find(|category| category.id == id)
            .map(|category| category.name.as_str())
    }

    pub fn task(&self, id: i64) -> Option<&Task> {
        self.list.find(id)
    }

    /// Tasks passing every active filter, in `sort` order.
    pub fn visible(&self) -> Vec<&Task> {
        let needle = self.search.trim().to_lowercase();
        let mut visible: Vec<&Task> = self
            .list
            .items()
            .iter()
            .filter(|task| self.tab.admits(task.status))
            .filter(|task| self.category.map_or(true, |id| task.category.id == id))
            .filter(|task| self.priority.map_or(true, |priority| task.priority == priority))
            .filter(|task| {
                needle.is_empty()
                    || task.title.to_lowercase().contains(&needle)
                    || task.description.to_lowercase().contains(&needle)
            })
            .collect();

        match self.sort {
            TaskSort::Newest => visible.sort_by_key(|task| Reverse(task.created_at)),
            TaskSort::StartDate => visible.sort_by_key(|task| task.start_datetime),
            TaskSort::EndDate => visible.sort_by_key(|task| task.end_datetime),
            TaskSort::Priority => visible.sort_by_key(|task| (Reverse(task.priority), task.start_datetime)),
        }
        visible
    }

    /// Per-status counts over the whole list, ignoring filters.
    pub fn counts(&self) -> StatusCounts {
        self.list
            .items()
            .iter()
            .fold(StatusCounts::default(), |mut counts, task| {
                counts.all += 1;
                match task.status {
                    TaskStatus::AFaire => counts.a_faire += 1,
                    TaskStatus::EnCours => counts.en_cours += 1,
                    TaskStatus::Terminee => counts.terminee += 1,
                }
                counts
            })
    }

    pub fn create(&mut self, input: &NewTask) -> Result<Task, ViewError> {
        self.list.ensure_ready()?;
        let mut created = self.list.check("create task", self.tasks.create(input))?;
        self.name_category(&mut created);
        self.list.push(created.clone());
        self.list.succeed("Task created");
        Ok(created)
    }

    pub fn update(&mut self, id: i64, patch: &TaskPatch) -> Result<Task, ViewError> {
        self.list.ensure_ready()?;
        let updated = self.list.check("update task", self.tasks.update(id, patch))?;
        self.apply(updated, "Task updated")
    }

    pub fn set_status(&mut self, id: i64, status: TaskStatus) -> Result<Task, ViewError> {
        self.list.ensure_ready()?;
        let updated = self
            .list
            .check("change task status", self.tasks.update_status(id, status))?;
        self.apply(updated, "Status updated")
    }

    /// Delete by id; a task the server no longer has is dropped locally.
    pub fn delete(&mut self, id: i64) -> Result<(), ViewError> {
        self.list.ensure_ready()?;
        match self.tasks.delete(id) {
            Ok(()) => {}
            Err(err) if err.is_not_found() => {
                tracing::debug!(id, "task already gone");
            }
            Err(err) => return Err(self.list.fail("delete task", err)),
        }
        self.list.remove(id);
        self.list.succeed("Task deleted");
        Ok(())
    }

    /// Persist what a `TaskForm` produced.
    pub fn save(&mut self, draft: TaskDraft) -> Result<Task, ViewError> {
        match draft {
            TaskDraft::Create(input) => self.create(&input),
            TaskDraft::Update { id, patch } => self.update(id, &patch),
        }
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

    fn apply(&mut self, mut updated: Task, message: &str) -> Result<Task, ViewError> {
        self.name_category(&mut updated);
        if !self.list.replace(updated.clone()) {
            self.list.push(updated.clone());
        }
        self.list.succeed(message);
        Ok(updated)
    }

    /// Backends that send only the category id leave the name blank.
    fn name_category(&self, task: &mut Task) {
        if task.category.name.is_empty() {
            if let Some(name) = self.category_name(task.category.id) {
                task.category.name = name.to_string();
            }
        }
    }

    fn fill_category_names(&mut self) {
        let categories = std::mem::take(&mut self.categories);
        for task in self.list.items_mut() {
            if task.category.name.is_empty() {
                if let Some(category) = categories.iter().find(|c| c.id == task.category.id) {
                    task.category.name = category.name.clone();
                }
            }
        }
        self.categories = categories;
    }
}
