use std::time::Instant;

use crate::form::CategoryDraft;
use crate::services::CategoryService;
use crate::transport::Transport;
use crate::types::{Category, NewCategory};
use crate::view::{ListState, LoadState, ViewError};

/// Order of the category list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategorySort {
    /// Server order.
    #[default]
    AsLoaded,
    AToZ,
    ZToA,
    /// Most recently created first (highest id).
    Recent,
}

/// Category list with name search and sorting.
#[derive(Debug)]
pub struct CategoryList<T> {
    service: CategoryService<T>,
    list: ListState<Category>,
    pub search: String,
    pub sort: CategorySort,
}

impl<T: Transport> CategoryList<T> {
    pub fn new(service: CategoryService<T>) -> Self {
        Self {
            service,
            list: ListState::default(),
            search: String::new(),
            sort: CategorySort::default(),
        }
    }

    pub fn load(&mut self) -> Result<(), ViewError> {
        self.list.begin_load();
        let fetched = self.service.get_all();
        self.list.finish_load("categories", fetched)
    }

    /// Full reload after a failed load.
    pub fn retry(&mut self) -> Result<(), ViewError> {
        self.load()
    }

    pub fn state(&self) -> &LoadState {
        self.list.load_state()
    }

    pub fn items(&self) -> &[Category] {
        self.list.items()
    }

    /// Categories matching `search` (case-insensitive), in `sort` order.
    pub fn visible(&self) -> Vec<&Category> {
        let needle = self.search.trim().to_lowercase();
        let mut visible: Vec<&Category> = self
            .list
            .items()
            .iter()
            .filter(|category| category.name.to_lowercase().contains(&needle))
            .collect();

        match self.sort {
            CategorySort::AsLoaded => {}
            CategorySort::AToZ => visible.sort_by_key(|category| category.name.to_lowercase()),
            CategorySort::ZToA => {
                visible.sort_by_key(|category| std::cmp::Reverse(category.name.to_lowercase()))
            }
            CategorySort::Recent => visible.sort_by_key(|category| std::cmp::Reverse(category.id)),
        }
        visible
    }

    pub fn create(&mut self, input: &NewCategory) -> Result<Category, ViewError> {
        self.list.ensure_ready()?;
        let created = self.list.check("create category", self.service.create(input))?;
        self.list.push(created.clone());
        self.list.succeed("Category created");
        Ok(created)
    }

    pub fn rename(&mut self, id: i64, input: &NewCategory) -> Result<Category, ViewError> {
        self.list.ensure_ready()?;
        let updated = self.list.check("rename category", self.service.update(id, input))?;
        if !self.list.replace(updated.clone()) {
            self.list.push(updated.clone());
        }
        self.list.succeed("Category updated");
        Ok(updated)
    }

    /// Delete by id. A category the server no longer has is dropped locally
    /// as if the delete had succeeded.
    pub fn delete(&mut self, id: i64) -> Result<(), ViewError> {
        self.list.ensure_ready()?;
        match self.service.delete(id) {
            Ok(()) => {}
            Err(err) if err.is_not_found() => {
                tracing::debug!(id, "category already gone");
            }
            Err(err) => return Err(self.list.fail("delete category", err)),
        }
        self.list.remove(id);
        self.list.succeed("Category deleted");
        Ok(())
    }

    /// Persist what a `CategoryForm` produced.
    pub fn save(&mut self, draft: CategoryDraft) -> Result<Category, ViewError> {
        match draft {
            CategoryDraft::Create(input) => self.create(&input),
            CategoryDraft::Rename { id, input } => self.rename(id, &input),
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
}
