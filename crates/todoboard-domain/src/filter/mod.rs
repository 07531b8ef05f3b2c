//! Task filtering by project and due-date bucket.
//!
//! Both filters default to permissive: an empty project selection and the
//! `All` due bucket let every task through.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::project::ProjectId;
use crate::task::Task;

pub trait TaskFilter {
    fn matches(&self, task: &Task) -> bool;
}

/// Selected projects; empty means all projects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFilter {
    project_ids: HashSet<ProjectId>,
}

impl ProjectFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn only(ids: impl IntoIterator<Item = impl Into<ProjectId>>) -> Self {
        Self {
            project_ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_all(&self) -> bool {
        self.project_ids.is_empty()
    }

    pub fn contains(&self, project_id: &str) -> bool {
        self.project_ids.contains(project_id)
    }

    pub fn toggle(&mut self, project_id: &str) {
        if !self.project_ids.remove(project_id) {
            self.project_ids.insert(project_id.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.project_ids.clear();
    }

    pub fn len(&self) -> usize {
        self.project_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.project_ids.is_empty()
    }
}

impl TaskFilter for ProjectFilter {
    fn matches(&self, task: &Task) -> bool {
        self.is_all() || self.project_ids.contains(&task.project_id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DueFilter {
    Today,
    TodayAndPast,
    #[default]
    All,
}

impl DueFilter {
    pub fn label(self) -> &'static str {
        match self {
            DueFilter::Today => "Today",
            DueFilter::TodayAndPast => "Today & overdue",
            DueFilter::All => "All dates",
        }
    }

    pub fn next(self) -> Self {
        match self {
            DueFilter::All => DueFilter::Today,
            DueFilter::Today => DueFilter::TodayAndPast,
            DueFilter::TodayAndPast => DueFilter::All,
        }
    }

    pub fn on(self, today: NaiveDate) -> DueBucketFilter {
        DueBucketFilter { bucket: self, today }
    }
}

/// A due bucket pinned to a calendar day.
#[derive(Debug, Clone, Copy)]
pub struct DueBucketFilter {
    bucket: DueFilter,
    today: NaiveDate,
}

impl TaskFilter for DueBucketFilter {
    fn matches(&self, task: &Task) -> bool {
        match self.bucket {
            DueFilter::All => true,
            DueFilter::Today => task.due_date() == Some(self.today),
            DueFilter::TodayAndPast => task.due_date().is_some_and(|date| date <= self.today),
        }
    }
}

/// AND-combination of filters; matches everything when empty.
#[derive(Default)]
pub struct CompositeFilter<'a> {
    filters: Vec<Box<dyn TaskFilter + 'a>>,
}

impl<'a> CompositeFilter<'a> {
    pub fn new() -> Self {
        Self { filters: vec![] }
    }

    pub fn with_filter(mut self, filter: impl TaskFilter + 'a) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl TaskFilter for CompositeFilter<'_> {
    fn matches(&self, task: &Task) -> bool {
        self.filters.iter().all(|f| f.matches(task))
    }
}

impl<T: TaskFilter + ?Sized> TaskFilter for &T {
    fn matches(&self, task: &Task) -> bool {
        (**self).matches(task)
    }
}

pub fn filtered<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    projects: &ProjectFilter,
    due: DueFilter,
    today: NaiveDate,
) -> Vec<&'a Task> {
    let filter = CompositeFilter::new()
        .with_filter(projects)
        .with_filter(due.on(today));
    tasks.into_iter().filter(|task| filter.matches(task)).collect()
}
