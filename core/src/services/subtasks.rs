use crate::client::ApiClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{NewSubtask, Subtask, SubtaskPatch};

/// CRUD and completion toggling over `/subtasks/`.
#[derive(Debug, Clone)]
pub struct SubtaskService<T> {
    client: ApiClient,
    transport: T,
}

impl<T: Transport> SubtaskService<T> {
    pub fn new(client: ApiClient, transport: T) -> Self {
        Self { client, transport }
    }

    /// All subtasks belonging to `task_id`.
    pub fn get_by_task(&self, task_id: i64) -> Result<Vec<Subtask>, ApiError> {
        let response = self.transport.execute(self.client.build_list_subtasks(task_id))?;
        self.client.parse_list_subtasks(response)
    }

    pub fn get_by_id(&self, id: i64) -> Result<Subtask, ApiError> {
        let response = self.transport.execute(self.client.build_get_subtask(id))?;
        self.client.parse_get_subtask(response)
    }

    pub fn create(&self, input: &NewSubtask) -> Result<Subtask, ApiError> {
        let response = self.transport.execute(self.client.build_create_subtask(input)?)?;
        self.client.parse_create_subtask(response)
    }

    pub fn update(&self, id: i64, patch: &SubtaskPatch) -> Result<Subtask, ApiError> {
        let response = self
            .transport
            .execute(self.client.build_update_subtask(id, patch)?)?;
        self.client.parse_update_subtask(response)
    }

    pub fn delete(&self, id: i64) -> Result<(), ApiError> {
        let response = self.transport.execute(self.client.build_delete_subtask(id))?;
        self.client.parse_delete_subtask(response)
    }

    /// Flip `is_done` by reading the current value and writing its negation.
    ///
    /// The two requests are not atomic: if another session toggles between
    /// them, the last write wins.
    pub fn toggle_status(&self, id: i64) -> Result<Subtask, ApiError> {
        let response = self.transport.execute(self.client.build_get_subtask(id))?;
        let current = self.client.parse_toggle_subtask(response)?;
        let patch = SubtaskPatch {
            is_done: Some(!current.is_done),
            ..SubtaskPatch::default()
        };
        let response = self
            .transport
            .execute(self.client.build_update_subtask(id, &patch)?)?;
        self.client.parse_toggle_subtask(response)
    }
}
