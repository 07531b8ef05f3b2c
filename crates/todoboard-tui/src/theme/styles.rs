use super::colors::*;
use chrono::NaiveDate;
use ratatui::style::{Modifier, Style};
use todoboard_domain::KanbanColumn;

pub fn focused_border() -> Style {
    Style::default().fg(FOCUSED_BORDER)
}

pub fn unfocused_border() -> Style {
    Style::default().fg(UNFOCUSED_BORDER)
}

pub fn selected_item(selected: bool) -> Style {
    if selected {
        Style::default().bg(SELECTED_BG)
    } else {
        Style::default()
    }
}

pub fn normal_text() -> Style {
    Style::default().fg(NORMAL_TEXT)
}

pub fn label_text() -> Style {
    Style::default().fg(LABEL_TEXT)
}

pub fn highlight_text() -> Style {
    Style::default().fg(HIGHLIGHT_TEXT)
}

pub fn bold_highlight() -> Style {
    Style::default()
        .fg(HIGHLIGHT_TEXT)
        .add_modifier(Modifier::BOLD)
}

/// Content of a card whose task has subtasks.
pub fn link_text() -> Style {
    Style::default()
        .fg(LINK_TEXT)
        .add_modifier(Modifier::UNDERLINED)
}

pub fn column_header(column: KanbanColumn) -> Style {
    let color = match column {
        KanbanColumn::Unset => COLUMN_UNSET,
        KanbanColumn::Todo => COLUMN_TODO,
        KanbanColumn::Blocked => COLUMN_BLOCKED,
        KanbanColumn::InProgress => COLUMN_IN_PROGRESS,
        KanbanColumn::Done => COLUMN_DONE,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

pub fn due_style(date: NaiveDate, today: NaiveDate) -> Style {
    if date < today {
        Style::default().fg(DUE_OVERDUE)
    } else if date == today {
        Style::default().fg(DUE_TODAY)
    } else {
        label_text()
    }
}

pub fn error_text() -> Style {
    Style::default().fg(ERROR_COLOR).add_modifier(Modifier::BOLD)
}

pub fn popup_bg() -> Style {
    Style::default().bg(POPUP_BG)
}
