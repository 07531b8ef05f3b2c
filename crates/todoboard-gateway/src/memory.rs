use async_trait::async_trait;
use parking_lot::Mutex;
use todoboard_domain::{Project, Task, TaskId};

use crate::error::{GatewayError, GatewayResult};
use crate::models::{NewTask, TaskUpdate};
use crate::traits::TaskGateway;

/// A call received by [`InMemoryGateway`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    ListTasks,
    ListProjects,
    Create(NewTask),
    Update(TaskId, TaskUpdate),
    Delete(TaskId),
    Close(TaskId),
}

impl GatewayCall {
    pub fn is_write(&self) -> bool {
        !matches!(self, GatewayCall::ListTasks | GatewayCall::ListProjects)
    }
}

#[derive(Default)]
struct State {
    tasks: Vec<Task>,
    projects: Vec<Project>,
    calls: Vec<GatewayCall>,
    failing_writes: Option<String>,
    failing_reads: Option<String>,
}

/// Process-local task service used for offline runs and tests.
#[derive(Default)]
pub struct InMemoryGateway {
    state: Mutex<State>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(tasks: Vec<Task>, projects: Vec<Project>) -> Self {
        Self {
            state: Mutex::new(State {
                tasks,
                projects,
                ..Default::default()
            }),
        }
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.state.lock().tasks.clone()
    }

    pub fn task(&self, id: &str) -> Option<Task> {
        self.state.lock().tasks.iter().find(|t| t.id == id).cloned()
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state.lock().calls.clone()
    }

    pub fn write_calls(&self) -> Vec<GatewayCall> {
        self.calls().into_iter().filter(GatewayCall::is_write).collect()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Make every following write fail with `message` (or succeed again with `None`).
    pub fn fail_writes(&self, message: Option<&str>) {
        self.state.lock().failing_writes = message.map(str::to_string);
    }

    pub fn fail_reads(&self, message: Option<&str>) {
        self.state.lock().failing_reads = message.map(str::to_string);
    }

    fn record(&self, call: GatewayCall) -> GatewayResult<()> {
        let mut state = self.state.lock();
        let failure = if call.is_write() {
            state.failing_writes.clone()
        } else {
            state.failing_reads.clone()
        };
        state.calls.push(call);
        match failure {
            Some(message) => Err(GatewayError::Status {
                status: 503,
                message,
            }),
            None => Ok(()),
        }
    }

    fn remove(&self, id: &str) -> GatewayResult<()> {
        let mut state = self.state.lock();
        let before = state.tasks.len();
        // Subtasks go with their parent, as on the real service.
        let mut doomed = vec![id.to_string()];
        while let Some(current) = doomed.pop() {
            let children: Vec<TaskId> = state
                .tasks
                .iter()
                .filter(|t| t.parent_id.as_deref() == Some(current.as_str()))
                .map(|t| t.id.clone())
                .collect();
            state.tasks.retain(|t| t.id != current);
            doomed.extend(children);
        }
        if state.tasks.len() == before {
            return Err(GatewayError::TaskNotFound(id.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TaskGateway for InMemoryGateway {
    async fn list_tasks(&self) -> GatewayResult<Vec<Task>> {
        self.record(GatewayCall::ListTasks)?;
        Ok(self.tasks())
    }

    async fn list_projects(&self) -> GatewayResult<Vec<Project>> {
        self.record(GatewayCall::ListProjects)?;
        Ok(self.state.lock().projects.clone())
    }

    async fn create_task(&self, task: NewTask) -> GatewayResult<Task> {
        self.record(GatewayCall::Create(task.clone()))?;
        let mut state = self.state.lock();
        let project_id = match &task.parent_id {
            Some(parent) => state
                .tasks
                .iter()
                .find(|t| &t.id == parent)
                .map(|t| t.project_id.clone())
                .ok_or_else(|| GatewayError::TaskNotFound(parent.clone()))?,
            None => state
                .projects
                .first()
                .map(|p| p.id.clone())
                .unwrap_or_default(),
        };
        let id = uuid::Uuid::new_v4().simple().to_string();
        let mut created = Task::new(id.clone(), task.content, project_id)
            .with_url(format!("memory://tasks/{id}"));
        created.parent_id = task.parent_id;
        state.tasks.push(created.clone());
        Ok(created)
    }

    async fn update_task(&self, id: TaskId, update: TaskUpdate) -> GatewayResult<Task> {
        self.record(GatewayCall::Update(id.clone(), update.clone()))?;
        let mut state = self.state.lock();
        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| GatewayError::TaskNotFound(id.clone()))?;
        update.apply_to(task);
        Ok(task.clone())
    }

    async fn delete_task(&self, id: TaskId) -> GatewayResult<()> {
        self.record(GatewayCall::Delete(id.clone()))?;
        self.remove(&id)
    }

    async fn close_task(&self, id: TaskId) -> GatewayResult<()> {
        self.record(GatewayCall::Close(id.clone()))?;
        self.remove(&id)
    }
}
