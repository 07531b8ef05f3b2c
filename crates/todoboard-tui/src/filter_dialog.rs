use crossterm::event::{KeyCode, KeyEvent};
use todoboard_domain::Project;

use crate::board::Filters;

/// Popup for editing [`Filters`]. Row 0 is the due bucket, the remaining
/// rows are projects in service order.
#[derive(Debug, Default)]
pub struct FilterDialog {
    cursor: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    Open,
    /// Filters were edited; the board needs reprojecting.
    Changed,
    Closed,
}

impl FilterDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        filters: &mut Filters,
        projects: &[Project],
    ) -> FilterOutcome {
        let rows = projects.len() + 1;
        match key.code {
            KeyCode::Esc | KeyCode::Char('f') | KeyCode::Char('q') => FilterOutcome::Closed,
            KeyCode::Char('j') | KeyCode::Down => {
                self.cursor = (self.cursor + 1).min(rows - 1);
                FilterOutcome::Open
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
                FilterOutcome::Open
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                match self.cursor.checked_sub(1) {
                    None => filters.due = filters.due.next(),
                    Some(index) => match projects.get(index) {
                        Some(project) => filters.projects.toggle(&project.id),
                        None => return FilterOutcome::Open,
                    },
                }
                FilterOutcome::Changed
            }
            KeyCode::Char('a') => {
                filters.projects.clear();
                FilterOutcome::Changed
            }
            _ => FilterOutcome::Open,
        }
    }
}
