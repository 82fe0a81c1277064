use std::fmt;

use crate::form::{remaining_chars, required, run_submission, truncate_chars, FormError, SubmitState};
use crate::types::{NewSubtask, SUBTASK_TITLE_MAX};

/// Add a subtask to one parent task.
#[derive(Debug, Clone)]
pub struct SubtaskForm {
    title: String,
    pub task_id: i64,
    state: SubmitState,
}

impl SubtaskForm {
    pub fn new(task_id: i64) -> Self {
        Self {
            title: String::new(),
            task_id,
            state: SubmitState::Idle,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, value: &str) {
        self.title = truncate_chars(value, SUBTASK_TITLE_MAX);
    }

    pub fn remaining(&self) -> usize {
        remaining_chars(&self.title, SUBTASK_TITLE_MAX)
    }

    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    pub fn validate(&self) -> Result<NewSubtask, FormError> {
        Ok(NewSubtask {
            title: required(&self.title, "title")?,
            task_id: self.task_id,
        })
    }

    pub fn submit<R, E: fmt::Display>(
        &mut self,
        persist: impl FnOnce(NewSubtask) -> Result<R, E>,
    ) -> Result<R, FormError> {
        let validated = self.validate();
        let result = run_submission(&mut self.state, validated, persist, "Subtask added");
        if result.is_ok() {
            self.title.clear();
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_carries_parent_task() {
        let mut form = SubtaskForm::new(3);
        form.set_title("Créer les routes");
        assert_eq!(
            form.validate().unwrap(),
            NewSubtask {
                title: "Créer les routes".to_string(),
                task_id: 3
            }
        );
    }

    #[test]
    fn blank_title_never_persists() {
        let mut form = SubtaskForm::new(3);
        let err = form
            .submit(|_| -> Result<(), String> { panic!("must not be called") })
            .unwrap_err();
        assert_eq!(err, FormError::Required("title"));
    }

    #[test]
    fn success_clears_title_keeps_parent() {
        let mut form = SubtaskForm::new(3);
        form.set_title("Tests");
        form.submit(|_| Ok::<(), String>(())).unwrap();
        assert!(form.title().is_empty());
        assert_eq!(form.task_id, 3);
    }
}
