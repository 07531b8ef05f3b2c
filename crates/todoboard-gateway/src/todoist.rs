use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use todoboard_core::config::DEFAULT_API_BASE_URL;
use todoboard_domain::{Due, Project, Task, TaskId};

use crate::error::{GatewayError, GatewayResult};
use crate::models::{NewTask, TaskUpdate};
use crate::traits::TaskGateway;

/// Due object as returned by the REST API.
#[derive(Debug, Deserialize)]
struct ApiDue {
    date: String,
    #[serde(default)]
    datetime: Option<String>,
    string: String,
    #[serde(default)]
    is_recurring: bool,
}

#[derive(Debug, Deserialize)]
struct ApiTask {
    id: String,
    content: String,
    #[serde(default)]
    parent_id: Option<String>,
    project_id: String,
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default)]
    due: Option<ApiDue>,
    #[serde(default)]
    url: String,
}

#[derive(Debug, Deserialize)]
struct ApiProject {
    id: String,
    name: String,
}

impl TryFrom<ApiDue> for Due {
    type Error = GatewayError;

    fn try_from(due: ApiDue) -> Result<Self, Self::Error> {
        let datetime = match due.datetime.as_deref() {
            Some(raw) => Some(
                Due::parse_datetime(raw)
                    .ok_or_else(|| GatewayError::Decode(format!("bad due datetime {raw:?}")))?,
            ),
            None => None,
        };
        let date = Due::parse_date(&due.date)
            .or_else(|| datetime.map(|dt| dt.date()))
            .ok_or_else(|| GatewayError::Decode(format!("bad due date {:?}", due.date)))?;
        Ok(Due {
            date,
            datetime,
            string: due.string,
            is_recurring: due.is_recurring,
        })
    }
}

impl TryFrom<ApiTask> for Task {
    type Error = GatewayError;

    fn try_from(task: ApiTask) -> Result<Self, Self::Error> {
        Ok(Task {
            id: task.id,
            content: task.content,
            parent_id: task.parent_id,
            project_id: task.project_id,
            labels: task.labels,
            due: task.due.map(Due::try_from).transpose()?,
            url: task.url,
        })
    }
}

impl From<ApiProject> for Project {
    fn from(project: ApiProject) -> Self {
        Project {
            id: project.id,
            name: project.name,
        }
    }
}

/// Todoist REST v2 client authenticated with a personal API token.
#[derive(Clone)]
pub struct TodoistClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for TodoistClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoistClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TodoistClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, DEFAULT_API_BASE_URL)
    }

    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
    }

    async fn send(&self, builder: RequestBuilder) -> GatewayResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        tracing::warn!("Task service returned {}: {}", status, message);
        Err(GatewayError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_for_task(&self, builder: RequestBuilder, id: &str) -> GatewayResult<Response> {
        match self.send(builder).await {
            Err(GatewayError::Status { status: 404, .. }) => {
                Err(GatewayError::TaskNotFound(id.to_string()))
            }
            other => other,
        }
    }
}

#[async_trait]
impl TaskGateway for TodoistClient {
    async fn list_tasks(&self) -> GatewayResult<Vec<Task>> {
        let response = self.send(self.request(Method::GET, "/tasks")).await?;
        let tasks: Vec<ApiTask> = response.json().await?;
        tracing::debug!("Fetched {} tasks", tasks.len());
        tasks.into_iter().map(Task::try_from).collect()
    }

    async fn list_projects(&self) -> GatewayResult<Vec<Project>> {
        let response = self.send(self.request(Method::GET, "/projects")).await?;
        let projects: Vec<ApiProject> = response.json().await?;
        tracing::debug!("Fetched {} projects", projects.len());
        Ok(projects.into_iter().map(Project::from).collect())
    }

    async fn create_task(&self, task: NewTask) -> GatewayResult<Task> {
        let response = self
            .send(self.request(Method::POST, "/tasks").json(&task))
            .await?;
        let created: ApiTask = response.json().await?;
        tracing::info!("Created task {}", created.id);
        Task::try_from(created)
    }

    async fn update_task(&self, id: TaskId, update: TaskUpdate) -> GatewayResult<Task> {
        if update.is_empty() {
            return Err(GatewayError::Invalid(format!("empty update for task {id}")));
        }
        let path = format!("/tasks/{id}");
        let response = self
            .send_for_task(self.request(Method::POST, &path).json(&update), &id)
            .await?;
        let updated: ApiTask = response.json().await?;
        tracing::debug!("Updated task {}", id);
        Task::try_from(updated)
    }

    async fn delete_task(&self, id: TaskId) -> GatewayResult<()> {
        let path = format!("/tasks/{id}");
        self.send_for_task(self.request(Method::DELETE, &path), &id)
            .await?;
        tracing::info!("Deleted task {}", id);
        Ok(())
    }

    async fn close_task(&self, id: TaskId) -> GatewayResult<()> {
        let path = format!("/tasks/{id}/close");
        self.send_for_task(self.request(Method::POST, &path), &id)
            .await?;
        tracing::info!("Closed task {}", id);
        Ok(())
    }
}
