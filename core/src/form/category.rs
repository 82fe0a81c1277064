use std::fmt;

use crate::form::{remaining_chars, required, run_submission, truncate_chars, FormError, SubmitState};
use crate::types::{Category, NewCategory, CATEGORY_NAME_MAX};

/// What a category form asks to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryDraft {
    Create(NewCategory),
    Rename { id: i64, input: NewCategory },
}

/// Create or rename a category.
#[derive(Debug, Clone, Default)]
pub struct CategoryForm {
    name: String,
    editing: Option<i64>,
    state: SubmitState,
}

impl CategoryForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Form prefilled for renaming `category`.
    pub fn edit(category: &Category) -> Self {
        let mut form = Self::new();
        form.editing = Some(category.id);
        form.set_name(&category.name);
        form
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Input longer than the limit is cut, like a `maxlength` field.
    pub fn set_name(&mut self, value: &str) {
        self.name = truncate_chars(value, CATEGORY_NAME_MAX);
    }

    pub fn remaining(&self) -> usize {
        remaining_chars(&self.name, CATEGORY_NAME_MAX)
    }

    pub fn editing(&self) -> Option<i64> {
        self.editing
    }

    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    /// The submit button is enabled only for a non-blank name while idle.
    pub fn can_submit(&self) -> bool {
        !self.name.trim().is_empty() && !self.state.is_submitting()
    }

    pub fn validate(&self) -> Result<CategoryDraft, FormError> {
        let input = NewCategory {
            name: required(&self.name, "name")?,
        };
        Ok(match self.editing {
            Some(id) => CategoryDraft::Rename { id, input },
            None => CategoryDraft::Create(input),
        })
    }

    pub fn submit<R, E: fmt::Display>(
        &mut self,
        persist: impl FnOnce(CategoryDraft) -> Result<R, E>,
    ) -> Result<R, FormError> {
        let validated = self.validate();
        let message = if self.editing.is_some() {
            "Category updated"
        } else {
            "Category created"
        };
        let result = run_submission(&mut self.state, validated, persist, message);
        if result.is_ok() {
            self.name.clear();
            self.editing = None;
        }
        result
    }
}
