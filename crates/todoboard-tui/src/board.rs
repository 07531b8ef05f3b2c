use std::collections::HashSet;

use chrono::NaiveDate;
use todoboard_domain::{
    by_parent, filtered, group_by_column, parent_set, project_id_to_name, relabel_for_column,
    sorted_by_due, DueFilter, KanbanColumn, Project, ProjectFilter, ProjectNames, SearchQuery,
    SearchState, Task, TaskId,
};

use crate::command::CommandInterpreter;
use crate::scroll::{ScrollRegistry, ScrollState};

/// Project and due-date filters shared by every view of a session.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    pub projects: ProjectFilter,
    pub due: DueFilter,
}

impl Filters {
    pub fn is_active(&self) -> bool {
        !self.projects.is_all() || self.due != DueFilter::All
    }
}

/// Everything a board view derives from the cache for one frame.
pub struct BoardProjection<'a> {
    /// Scoped, filtered and due-sorted tasks.
    pub visible: Vec<&'a Task>,
    pub columns: [Vec<&'a Task>; KanbanColumn::COUNT],
    pub parents: HashSet<TaskId>,
    pub project_names: ProjectNames,
    /// Search hits in column order.
    pub matches: Vec<&'a Task>,
}

impl<'a> BoardProjection<'a> {
    pub fn build(
        tasks: &'a [Task],
        projects: &[Project],
        parent_id: Option<&str>,
        filters: &Filters,
        search: Option<&SearchQuery>,
        today: NaiveDate,
    ) -> Self {
        let scoped = by_parent(tasks, parent_id);
        let visible = sorted_by_due(filtered(scoped, &filters.projects, filters.due, today));
        let columns = group_by_column(&visible);
        let matches = search.map(|q| q.matching(&visible)).unwrap_or_default();
        Self {
            visible,
            columns,
            parents: parent_set(tasks),
            project_names: project_id_to_name(projects),
            matches,
        }
    }

    pub fn task(&self, id: &str) -> Option<&'a Task> {
        self.visible.iter().copied().find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.task(id).is_some()
    }

    pub fn has_subtasks(&self, id: &str) -> bool {
        self.parents.contains(id)
    }

    pub fn project_name(&self, project_id: &str) -> Option<&str> {
        self.project_names.get(project_id).map(String::as_str)
    }

    /// Cards in reading order: column by column, top to bottom.
    pub fn card_order(&self) -> impl Iterator<Item = &'a Task> + '_ {
        self.columns.iter().flat_map(|column| column.iter().copied())
    }

    pub fn match_position(&self, id: &str) -> Option<usize> {
        self.matches.iter().position(|t| t.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Left,
    Right,
}

/// Label change that moves a card one column over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardMove {
    pub task_id: TaskId,
    pub from: KanbanColumn,
    pub to: KanbanColumn,
    pub labels: Vec<String>,
}

/// Per-view kanban state: selection, search cursor, scroll position and the
/// view's own key interpreter.
#[derive(Debug)]
pub struct BoardView {
    parent_id: Option<TaskId>,
    selected_task_id: Option<TaskId>,
    search: SearchState,
    interpreter: CommandInterpreter,
    scroll: ScrollState,
    registry: ScrollRegistry,
}

impl BoardView {
    pub fn new(parent_id: Option<TaskId>) -> Self {
        Self {
            parent_id,
            selected_task_id: None,
            search: SearchState::new(),
            interpreter: CommandInterpreter::new(),
            scroll: ScrollState::default(),
            registry: ScrollRegistry::new(),
        }
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    pub fn selected_task_id(&self) -> Option<&str> {
        self.selected_task_id.as_deref()
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn registry(&self) -> &ScrollRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ScrollRegistry {
        &mut self.registry
    }

    pub fn interpreter(&self) -> &CommandInterpreter {
        &self.interpreter
    }

    pub fn interpreter_mut(&mut self) -> &mut CommandInterpreter {
        &mut self.interpreter
    }

    /// Select a card as a pointer click would: the search cursor lets go of
    /// the selection.
    pub fn click(&mut self, id: TaskId) {
        self.search.clear_match_index();
        self.reveal(&id);
        self.selected_task_id = Some(id);
    }

    pub fn clear_selection(&mut self) {
        self.selected_task_id = None;
    }

    /// Esc: drop the search and the selection.
    pub fn escape(&mut self) {
        self.search.clear();
        self.selected_task_id = None;
    }

    pub fn begin_search(&mut self, text: Option<String>) {
        self.search.begin(text);
    }

    pub fn next_match(&mut self, match_count: usize) {
        self.search.next(match_count);
    }

    pub fn prev_match(&mut self, match_count: usize) {
        self.search.prev(match_count);
    }

    /// Keep the search cursor on `id` after its position in the match list
    /// changed.
    pub fn follow_match(&mut self, id: &str, projection: &BoardProjection<'_>) {
        if let Some(position) = projection.match_position(id) {
            self.search.focus(position);
        }
    }

    /// Bring selection, search cursor and scroll back in line with freshly
    /// projected data.
    pub fn reconcile(&mut self, projection: &BoardProjection<'_>) {
        self.registry.layout(&projection.columns);

        self.search.clamp(projection.matches.len());
        if let Some(current) = self.search.current(&projection.matches) {
            if self.selected_task_id.as_deref() != Some(current.id.as_str()) {
                self.selected_task_id = Some(current.id.clone());
                self.reveal(&current.id);
            }
        }

        if let Some(id) = self.selected_task_id.as_deref() {
            if !projection.contains(id) {
                tracing::debug!("Selected task {} left the board", id);
                self.selected_task_id = None;
            }
        }

        let viewport = self.scroll.viewport();
        self.scroll
            .set_viewport(viewport, self.registry.content_height());
    }

    /// Tab / BackTab: step through cards in reading order, wrapping.
    pub fn select_relative(&mut self, projection: &BoardProjection<'_>, forward: bool) {
        let order: Vec<&Task> = projection.card_order().collect();
        if order.is_empty() {
            return;
        }
        let current = self
            .selected_task_id
            .as_deref()
            .and_then(|id| order.iter().position(|t| t.id == id));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => order.len() - 1,
            (Some(i), true) => (i + 1) % order.len(),
            (Some(i), false) => (i + order.len() - 1) % order.len(),
        };
        self.click(order[next].id.clone());
    }

    /// The label change for moving the selected card, or `None` when nothing
    /// is selected or the card is already in the edge column.
    pub fn plan_move(
        &self,
        projection: &BoardProjection<'_>,
        direction: MoveDirection,
    ) -> Option<CardMove> {
        let task = projection.task(self.selected_task_id.as_deref()?)?;
        let from = task.column();
        let to = match direction {
            MoveDirection::Left => from.left()?,
            MoveDirection::Right => from.right()?,
        };
        Some(CardMove {
            task_id: task.id.clone(),
            from,
            to,
            labels: relabel_for_column(&task.labels, to),
        })
    }

    pub fn set_viewport(&mut self, rows: usize) {
        self.scroll.set_viewport(rows, self.registry.content_height());
    }

    pub fn reveal(&mut self, id: &str) {
        if let Some(span) = self.registry.span(id) {
            self.scroll.reveal(span);
        }
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll.to_top();
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll.to_bottom(self.registry.content_height());
    }

    pub fn page_down(&mut self) {
        self.scroll.page_down(self.registry.content_height());
    }

    pub fn page_up(&mut self) {
        self.scroll.page_up();
    }

    pub fn half_page_down(&mut self) {
        self.scroll.half_page_down(self.registry.content_height());
    }

    pub fn half_page_up(&mut self) {
        self.scroll.half_page_up();
    }

    pub fn scroll_by(&mut self, rows: isize) {
        if rows >= 0 {
            self.scroll
                .down(rows.unsigned_abs(), self.registry.content_height());
        } else {
            self.scroll.up(rows.unsigned_abs());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn tasks() -> Vec<Task> {
        vec![
            Task::new("1", "Plan trip", "p").with_labels(["KANBAN_TODO"]),
            Task::new("2", "Book hotel", "p").with_labels(["travel", "KANBAN_IN_PROGRESS"]),
            Task::new("3", "Pack", "p").with_labels(["KANBAN_DONE"]),
            Task::new("4", "Renew passport", "p"),
            Task::new("5", "Scan passport", "p").with_parent("4"),
        ]
    }

    fn project<'a>(tasks: &'a [Task], search: Option<&SearchQuery>) -> BoardProjection<'a> {
        BoardProjection::build(tasks, &[], None, &Filters::default(), search, today())
    }

    #[test]
    fn test_projection_groups_top_level_tasks() {
        let tasks = tasks();
        let projection = project(&tasks, None);
        let ids: Vec<&str> = projection.card_order().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["4", "1", "2", "3"]);
        assert!(projection.has_subtasks("4"));
        assert!(!projection.contains("5"));
    }

    #[test]
    fn test_plan_move_at_edges() {
        let tasks = tasks();
        let projection = project(&tasks, None);
        let mut view = BoardView::new(None);

        assert_eq!(view.plan_move(&projection, MoveDirection::Right), None);

        view.click("3".into());
        assert_eq!(view.plan_move(&projection, MoveDirection::Right), None);

        view.click("4".into());
        assert_eq!(view.plan_move(&projection, MoveDirection::Left), None);

        view.click("2".into());
        let planned = view.plan_move(&projection, MoveDirection::Right).unwrap();
        assert_eq!(planned.from, KanbanColumn::InProgress);
        assert_eq!(planned.to, KanbanColumn::Done);
        assert_eq!(planned.labels, ["travel", "KANBAN_DONE"]);
    }

    #[test]
    fn test_search_drives_selection() {
        let tasks = tasks();
        let query = SearchQuery::new("p");
        let projection = project(&tasks, Some(&query));
        let mut view = BoardView::new(None);

        view.begin_search(Some("p".into()));
        view.reconcile(&projection);
        // "Renew passport" (unset) sorts before "Plan trip" (todo).
        assert_eq!(view.selected_task_id(), Some("4"));

        view.next_match(projection.matches.len());
        view.reconcile(&projection);
        assert_eq!(view.selected_task_id(), Some("1"));

        view.click("2".into());
        view.reconcile(&projection);
        assert_eq!(view.selected_task_id(), Some("2"));
        assert_eq!(view.search().match_index(), None);
    }

    #[test]
    fn test_reconcile_drops_vanished_selection() {
        let mut tasks = tasks();
        let mut view = BoardView::new(None);
        view.click("1".into());

        tasks.retain(|t| t.id != "1");
        let projection = project(&tasks, None);
        view.reconcile(&projection);
        assert_eq!(view.selected_task_id(), None);
    }

    #[test]
    fn test_escape_clears_search_and_selection() {
        let tasks = tasks();
        let query = SearchQuery::new("Pack");
        let projection = project(&tasks, Some(&query));
        let mut view = BoardView::new(None);
        view.begin_search(Some("Pack".into()));
        view.reconcile(&projection);
        assert_eq!(view.selected_task_id(), Some("3"));

        view.escape();
        assert_eq!(view.selected_task_id(), None);
        assert!(view.search().query().is_none());
    }

    #[test]
    fn test_tab_cycles_in_reading_order() {
        let tasks = tasks();
        let projection = project(&tasks, None);
        let mut view = BoardView::new(None);

        view.select_relative(&projection, true);
        assert_eq!(view.selected_task_id(), Some("4"));
        view.select_relative(&projection, false);
        assert_eq!(view.selected_task_id(), Some("3"));
        view.select_relative(&projection, true);
        assert_eq!(view.selected_task_id(), Some("4"));
    }

    #[test]
    fn test_filters_apply_before_columns() {
        let tasks = tasks();
        let filters = Filters {
            projects: ProjectFilter::only(["elsewhere"]),
            due: DueFilter::All,
        };
        assert!(filters.is_active());
        let projection = BoardProjection::build(&tasks, &[], None, &filters, None, today());
        assert!(projection.visible.is_empty());
    }
}
