use serde::{Deserialize, Serialize};
use todoboard_domain::{Task, TaskId};

/// Request body for creating a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub parent_id: Option<TaskId>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub due_string: Option<String>,
}

impl NewTask {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            parent_id: None,
            due_string: None,
        }
    }

    pub fn under(mut self, parent_id: Option<TaskId>) -> Self {
        self.parent_id = parent_id;
        self
    }

    /// Parse quick-add input of the form `content` or `content|due string`.
    ///
    /// Only the first `|` separates; both parts are trimmed and an empty due
    /// part is dropped. Returns `None` when there is no content.
    pub fn parse(input: &str, parent_id: Option<TaskId>) -> Option<Self> {
        let (content, due) = match input.split_once('|') {
            Some((content, due)) => (content.trim(), Some(due.trim())),
            None => (input.trim(), None),
        };
        if content.is_empty() {
            return None;
        }
        Some(Self {
            content: content.to_string(),
            parent_id,
            due_string: due.filter(|d| !d.is_empty()).map(str::to_string),
        })
    }
}

/// Partial update; `None` fields are left untouched by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub due_string: Option<String>,
}

impl TaskUpdate {
    pub fn labels(labels: Vec<String>) -> Self {
        Self {
            labels: Some(labels),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.labels.is_none() && self.due_string.is_none()
    }

    /// Apply the locally representable fields to a cached task.
    ///
    /// `due_string` needs the service's natural-language parser, so it is left
    /// for the next refetch to fill in.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(content) = &self.content {
            task.content = content.clone();
        }
        if let Some(labels) = &self.labels {
            task.labels = labels.clone();
        }
    }
}
