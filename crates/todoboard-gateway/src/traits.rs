use async_trait::async_trait;
use todoboard_domain::{Project, Task, TaskId};

use crate::error::GatewayResult;
use crate::models::{NewTask, TaskUpdate};

/// Operations the board consumes from the task service.
#[async_trait]
pub trait TaskGateway: Send + Sync {
    async fn list_tasks(&self) -> GatewayResult<Vec<Task>>;

    async fn list_projects(&self) -> GatewayResult<Vec<Project>>;

    async fn create_task(&self, task: NewTask) -> GatewayResult<Task>;

    /// Apply a partial update and return the task as stored by the service.
    async fn update_task(&self, id: TaskId, update: TaskUpdate) -> GatewayResult<Task>;

    async fn delete_task(&self, id: TaskId) -> GatewayResult<()>;

    /// Mark the task complete. Closed tasks drop out of `list_tasks`.
    async fn close_task(&self, id: TaskId) -> GatewayResult<()>;
}
