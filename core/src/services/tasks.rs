use crate::client::ApiClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{NewTask, Task, TaskPatch, TaskPriority, TaskStatus};

/// CRUD, status changes and server-side filters over `/tasks/`.
#[derive(Debug, Clone)]
pub struct TaskService<T> {
    client: ApiClient,
    transport: T,
}

impl<T: Transport> TaskService<T> {
    pub fn new(client: ApiClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn get_all(&self) -> Result<Vec<Task>, ApiError> {
        let response = self.transport.execute(self.client.build_list_tasks())?;
        self.client.parse_list_tasks(response)
    }

    pub fn get_by_id(&self, id: i64) -> Result<Task, ApiError> {
        let response = self.transport.execute(self.client.build_get_task(id))?;
        self.client.parse_get_task(response)
    }

    pub fn create(&self, input: &NewTask) -> Result<Task, ApiError> {
        let response = self.transport.execute(self.client.build_create_task(input)?)?;
        self.client.parse_create_task(response)
    }

    /// Partial update: fields left `None` in `patch` are unchanged.
    pub fn update(&self, id: i64, patch: &TaskPatch) -> Result<Task, ApiError> {
        let response = self.transport.execute(self.client.build_update_task(id, patch)?)?;
        self.client.parse_update_task(response)
    }

    pub fn delete(&self, id: i64) -> Result<(), ApiError> {
        let response = self.transport.execute(self.client.build_delete_task(id))?;
        self.client.parse_delete_task(response)
    }

    pub fn update_status(&self, id: i64, status: TaskStatus) -> Result<Task, ApiError> {
        let response = self
            .transport
            .execute(self.client.build_update_task_status(id, status)?)?;
        self.client.parse_update_task_status(response)
    }

    pub fn filter_by_status(&self, status: TaskStatus) -> Result<Vec<Task>, ApiError> {
        let response = self
            .transport
            .execute(self.client.build_filter_tasks_by_status(status))?;
        self.client.parse_filter_tasks(response)
    }

    pub fn filter_by_priority(&self, priority: TaskPriority) -> Result<Vec<Task>, ApiError> {
        let response = self
            .transport
            .execute(self.client.build_filter_tasks_by_priority(priority))?;
        self.client.parse_filter_tasks(response)
    }

    pub fn filter_by_category(&self, category_id: i64) -> Result<Vec<Task>, ApiError> {
        let response = self
            .transport
            .execute(self.client.build_filter_tasks_by_category(category_id))?;
        self.client.parse_filter_tasks(response)
    }
}
