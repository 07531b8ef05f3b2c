pub mod column;
pub mod filter;
pub mod project;
pub mod projection;
pub mod search;
pub mod sort;
pub mod task;

pub use column::{is_reserved_label, relabel_for_column, KanbanColumn, RESERVED_LABELS};
pub use filter::{filtered, CompositeFilter, DueBucketFilter, DueFilter, ProjectFilter, TaskFilter};
pub use project::{Project, ProjectId};
pub use projection::{by_parent, group_by_column, parent_set, project_id_to_name, ProjectNames};
pub use search::{SearchQuery, SearchState};
pub use sort::{compare_due, sorted_by_due};
pub use task::{Due, Task, TaskId};
