use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::column::KanbanColumn;
use crate::project::ProjectId;

pub type TaskId = String;

/// Due date as reported by the task service.
///
/// `datetime` is present only for tasks with a time of day. Values that carry a
/// UTC offset are normalised to UTC; floating times are kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Due {
    pub date: NaiveDate,
    #[serde(default)]
    pub datetime: Option<NaiveDateTime>,
    pub string: String,
    #[serde(default)]
    pub is_recurring: bool,
}

impl Due {
    pub fn on(date: NaiveDate, string: impl Into<String>) -> Self {
        Self {
            date,
            datetime: None,
            string: string.into(),
            is_recurring: false,
        }
    }

    pub fn at(datetime: NaiveDateTime, string: impl Into<String>) -> Self {
        Self {
            date: datetime.date(),
            datetime: Some(datetime),
            string: string.into(),
            is_recurring: false,
        }
    }

    /// Parse a wire timestamp: RFC 3339 with offset, or a floating
    /// `YYYY-MM-DDTHH:MM:SS[.f]` value.
    pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_utc());
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()
    }

    pub fn parse_date(raw: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub content: String,
    #[serde(default)]
    pub parent_id: Option<TaskId>,
    pub project_id: ProjectId,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub due: Option<Due>,
    #[serde(default)]
    pub url: String,
}

impl Task {
    pub fn new(
        id: impl Into<TaskId>,
        content: impl Into<String>,
        project_id: impl Into<ProjectId>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            parent_id: None,
            project_id: project_id.into(),
            labels: Vec::new(),
            due: None,
            url: String::new(),
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<TaskId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_due(mut self, due: Due) -> Self {
        self.due = Some(due);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn column(&self) -> KanbanColumn {
        KanbanColumn::for_labels(&self.labels)
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due.as_ref().map(|due| due.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime_with_offset_is_utc() {
        let parsed = Due::parse_datetime("2024-03-05T10:30:00+02:00").unwrap();
        assert_eq!(parsed.to_string(), "2024-03-05 08:30:00");
    }

    #[test]
    fn test_parse_datetime_floating() {
        let parsed = Due::parse_datetime("2024-03-05T10:30:00").unwrap();
        assert_eq!(parsed.to_string(), "2024-03-05 10:30:00");
        let fractional = Due::parse_datetime("2024-03-05T10:30:00.000000Z").unwrap();
        assert_eq!(fractional.to_string(), "2024-03-05 10:30:00");
    }

    #[test]
    fn test_parse_datetime_rejects_date_only() {
        assert!(Due::parse_datetime("2024-03-05").is_none());
        assert_eq!(
            Due::parse_date("2024-03-05"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
    }

    #[test]
    fn test_task_deserializes_from_service_shape() {
        let json = r#"{
            "id": "2995104339",
            "content": "Buy Milk",
            "parent_id": null,
            "project_id": "2203306141",
            "labels": ["Food", "KANBAN_TODO"],
            "url": "https://todoist.com/showTask?id=2995104339"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, "2995104339");
        assert!(task.parent_id.is_none());
        assert!(task.due.is_none());
        assert_eq!(task.column(), KanbanColumn::Todo);
    }
}
