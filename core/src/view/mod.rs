//! View-state containers.
//!
//! # Design
//! A container owns the session copy of one entity list and the services that
//! feed it. It loads once, derives filtered/sorted views on demand, and
//! patches its list only after the server confirmed a mutation: create
//! appends, update replaces by id, delete removes by id. Failures are caught
//! here, logged, and kept as a displayable message; a failed initial load
//! blocks mutations until `retry` succeeds.

mod categories;
mod subtasks;
mod tasks;

use std::time::Instant;

use crate::error::ApiError;
use crate::form::FormError;
use crate::notice::Notice;
use crate::types::Entity;

pub use categories::{CategoryList, CategorySort};
pub use subtasks::SubtaskList;
pub use tasks::{StatusCounts, StatusTab, TaskBoard, TaskSort};

/// Errors surfaced by container operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    /// The initial load has not succeeded; call `retry` first.
    #[error("the list is not loaded")]
    NotReady,

    #[error("{}", .0.message())]
    Api(#[from] ApiError),

    /// Input refused before any request was made.
    #[error(transparent)]
    Form(#[from] FormError),
}

impl ViewError {
    pub fn message(&self) -> String {
        self.to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    /// Blocks the whole view until a reload succeeds.
    Failed(String),
}

/// List, load state and feedback shared by every container.
#[derive(Debug, Clone)]
pub(crate) struct ListState<E> {
    items: Vec<E>,
    load: LoadState,
    error: Option<String>,
    notice: Option<Notice>,
}

impl<E> Default for ListState<E> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            load: LoadState::Idle,
            error: None,
            notice: None,
        }
    }
}

impl<E: Entity> ListState<E> {
    pub(crate) fn items(&self) -> &[E] {
        &self.items
    }

    pub(crate) fn items_mut(&mut self) -> &mut [E] {
        &mut self.items
    }

    pub(crate) fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub(crate) fn begin_load(&mut self) {
        self.load = LoadState::Loading;
    }

    pub(crate) fn finish_load(&mut self, what: &str, fetched: Result<Vec<E>, ApiError>) -> Result<(), ViewError> {
        match fetched {
            Ok(items) => {
                tracing::info!(count = items.len(), "{what} loaded");
                self.items = items;
                self.load = LoadState::Ready;
                self.error = None;
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to load {what}");
                self.load = LoadState::Failed(err.message().to_string());
                Err(err.into())
            }
        }
    }

    pub(crate) fn ensure_ready(&self) -> Result<(), ViewError> {
        match self.load {
            LoadState::Ready => Ok(()),
            _ => Err(ViewError::NotReady),
        }
    }

    /// Log a failed action and keep its message for display.
    pub(crate) fn fail(&mut self, action: &str, err: ApiError) -> ViewError {
        tracing::error!(error = %err, "{action} failed");
        self.error = Some(err.message().to_string());
        err.into()
    }

    pub(crate) fn check<R>(&mut self, action: &str, result: Result<R, ApiError>) -> Result<R, ViewError> {
        result.map_err(|err| self.fail(action, err))
    }

    pub(crate) fn succeed(&mut self, message: &str) {
        self.error = None;
        self.notice = Some(Notice::new(message));
    }

    pub(crate) fn push(&mut self, item: E) {
        self.items.push(item);
    }

    /// Replace the element with the same id. Returns false if none matched.
    pub(crate) fn replace(&mut self, item: E) -> bool {
        match self.items.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    /// Remove the element with `id`. Returns false if none matched.
    pub(crate) fn remove(&mut self, id: i64) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        self.items.len() != before
    }

    pub(crate) fn find(&self, id: i64) -> Option<&E> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub(crate) fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub(crate) fn notice_at(&self, now: Instant) -> Option<&str> {
        self.notice
            .as_ref()
            .filter(|notice| notice.is_visible_at(now))
            .map(|notice| notice.message.as_str())
    }
}
