//! Derived views over the cached task and project lists.

use std::collections::{HashMap, HashSet};

use crate::column::KanbanColumn;
use crate::project::{Project, ProjectId};
use crate::task::{Task, TaskId};

pub type ProjectNames = HashMap<ProjectId, String>;

/// Tasks directly under `parent_id`, or the top-level tasks when `None`.
pub fn by_parent<'a>(tasks: &'a [Task], parent_id: Option<&str>) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| task.parent_id.as_deref() == parent_id)
        .collect()
}

/// Ids of every task that has at least one subtask.
pub fn parent_set(tasks: &[Task]) -> HashSet<TaskId> {
    tasks
        .iter()
        .filter_map(|task| task.parent_id.clone())
        .collect()
}

pub fn project_id_to_name(projects: &[Project]) -> ProjectNames {
    projects
        .iter()
        .map(|project| (project.id.clone(), project.name.clone()))
        .collect()
}

/// Split tasks into board columns, preserving input order inside each column.
pub fn group_by_column<'a>(tasks: &[&'a Task]) -> [Vec<&'a Task>; KanbanColumn::COUNT] {
    let mut columns: [Vec<&'a Task>; KanbanColumn::COUNT] = Default::default();
    for task in tasks {
        columns[task.column().index()].push(*task);
    }
    columns
}
