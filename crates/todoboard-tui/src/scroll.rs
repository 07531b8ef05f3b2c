use std::collections::HashMap;

use ratatui::layout::{Position, Rect};
use todoboard_domain::{KanbanColumn, Task, TaskId};

/// Rows a card occupies: borders plus content and project lines, and one more
/// when the task has a due date.
pub fn card_height(task: &Task) -> usize {
    if task.due.is_some() {
        5
    } else {
        4
    }
}

/// Vertical extent of a card in board coordinates (row 0 is the first card row).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpan {
    pub column: KanbanColumn,
    pub top: usize,
    pub height: usize,
}

impl RowSpan {
    pub fn bottom(&self) -> usize {
        self.top + self.height
    }
}

/// Where every card sits, so the board can scroll a card into view and map
/// mouse clicks back to tasks.
#[derive(Debug, Default)]
pub struct ScrollRegistry {
    spans: HashMap<TaskId, RowSpan>,
    content_height: usize,
    hit_areas: Vec<(Rect, TaskId)>,
}

impl ScrollRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute spans for the given column contents.
    pub fn layout(&mut self, columns: &[Vec<&Task>]) {
        self.spans.clear();
        self.content_height = 0;
        for (index, tasks) in columns.iter().enumerate() {
            let Some(column) = KanbanColumn::from_index(index) else {
                continue;
            };
            let mut top = 0;
            for task in tasks {
                let height = card_height(task);
                self.spans.insert(task.id.clone(), RowSpan { column, top, height });
                top += height;
            }
            self.content_height = self.content_height.max(top);
        }
    }

    pub fn span(&self, id: &str) -> Option<RowSpan> {
        self.spans.get(id).copied()
    }

    pub fn content_height(&self) -> usize {
        self.content_height
    }

    /// Forget last frame's click targets.
    pub fn clear_hits(&mut self) {
        self.hit_areas.clear();
    }

    pub fn record_hit(&mut self, area: Rect, id: TaskId) {
        self.hit_areas.push((area, id));
    }

    pub fn hit(&self, column: u16, row: u16) -> Option<&TaskId> {
        let position = Position::new(column, row);
        self.hit_areas
            .iter()
            .find(|(area, _)| area.contains(position))
            .map(|(_, id)| id)
    }
}

/// Scroll offset of the card area, in rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    offset: usize,
    viewport: usize,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            offset: 0,
            viewport: 20,
        }
    }
}

impl ScrollState {
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn viewport(&self) -> usize {
        self.viewport
    }

    pub fn set_viewport(&mut self, rows: usize, content_height: usize) {
        self.viewport = rows.max(1);
        self.clamp(content_height);
    }

    pub fn to_top(&mut self) {
        self.offset = 0;
    }

    pub fn to_bottom(&mut self, content_height: usize) {
        self.offset = Self::max_offset(content_height, self.viewport);
    }

    pub fn down(&mut self, rows: usize, content_height: usize) {
        self.offset = (self.offset + rows).min(Self::max_offset(content_height, self.viewport));
    }

    pub fn up(&mut self, rows: usize) {
        self.offset = self.offset.saturating_sub(rows);
    }

    pub fn page_down(&mut self, content_height: usize) {
        self.down(self.viewport, content_height);
    }

    pub fn page_up(&mut self) {
        self.up(self.viewport);
    }

    pub fn half_page_down(&mut self, content_height: usize) {
        self.down((self.viewport / 2).max(1), content_height);
    }

    pub fn half_page_up(&mut self) {
        self.up((self.viewport / 2).max(1));
    }

    /// Move the least distance that puts the whole span on screen.
    pub fn reveal(&mut self, span: RowSpan) {
        if span.top < self.offset {
            self.offset = span.top;
        } else if span.bottom() > self.offset + self.viewport {
            self.offset = span.bottom().saturating_sub(self.viewport).min(span.top);
        }
    }

    /// Scroll a one-row list entry into view.
    pub fn reveal_row(&mut self, row: usize) {
        if row < self.offset {
            self.offset = row;
        } else if row >= self.offset + self.viewport {
            self.offset = row + 1 - self.viewport;
        }
    }

    pub fn is_visible(&self, span: RowSpan) -> bool {
        span.top >= self.offset && span.bottom() <= self.offset + self.viewport
    }

    fn clamp(&mut self, content_height: usize) {
        self.offset = self.offset.min(Self::max_offset(content_height, self.viewport));
    }

    fn max_offset(content_height: usize, viewport: usize) -> usize {
        content_height.saturating_sub(viewport)
    }
}
