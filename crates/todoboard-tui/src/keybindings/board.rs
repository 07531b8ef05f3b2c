use super::{Keybinding, KeybindingContext, KeybindingProvider};
use crate::command::Command;

fn navigation() -> Vec<Keybinding> {
    vec![
        Keybinding::new("g t", "", "Go to the task list", Command::GoTaskList),
        Keybinding::new("g h", "", "Go to the root board", Command::GoRoot),
        Keybinding::new("H", "", "History back", Command::HistoryBack),
        Keybinding::new("L", "", "History forward", Command::HistoryForward),
        Keybinding::new("r", "", "Reload tasks and projects", Command::Refetch),
        Keybinding::new("?", "help", "Toggle this help", Command::Help),
        Keybinding::new("q", "quit", "Quit", Command::Quit),
    ]
}

fn scrolling() -> Vec<Keybinding> {
    vec![
        Keybinding::new("j", "", "Scroll half a page down", Command::HalfPageDown),
        Keybinding::new("k", "", "Scroll half a page up", Command::HalfPageUp),
        Keybinding::new("Ctrl+d", "", "Scroll a page down", Command::PageDown),
        Keybinding::new("Ctrl+u", "", "Scroll a page up", Command::PageUp),
        Keybinding::new("g g", "", "Scroll to top", Command::ScrollTop),
        Keybinding::new("G", "", "Scroll to bottom", Command::ScrollBottom),
    ]
}

pub struct KanbanProvider;

impl KeybindingProvider for KanbanProvider {
    fn get_context(&self) -> KeybindingContext {
        let mut bindings = vec![
            Keybinding::new("h/←", "left", "Move selected card left", Command::MoveLeft),
            Keybinding::new("l/→", "right", "Move selected card right", Command::MoveRight),
            Keybinding::new("Tab", "select", "Select next card", Command::SelectNext),
            Keybinding::new("S-Tab", "", "Select previous card", Command::SelectPrev),
            Keybinding::new("/", "search", "Search task content", Command::Search),
            Keybinding::new("n", "", "Next search match", Command::NextMatch),
            Keybinding::new("N", "", "Previous search match", Command::PrevMatch),
            Keybinding::new("Esc", "", "Clear search and selection", Command::Escape),
            Keybinding::new("o", "new", "Create task (content|due)", Command::CreateTask),
            Keybinding::new("x", "delete", "Delete selected task", Command::DeleteTask),
            Keybinding::new("c", "close", "Complete selected task", Command::CloseTask),
            Keybinding::new("Enter", "", "Open subtasks of selected card", Command::FollowLink),
            Keybinding::new("g d", "", "Open detail view of selected card", Command::OpenDetail),
            Keybinding::new("O", "", "Open selected task in browser", Command::OpenUrl),
            Keybinding::new("f", "filter", "Filter by project and due date", Command::Filter),
        ];
        bindings.extend(scrolling());
        bindings.extend(navigation());
        KeybindingContext::new("Board", bindings)
    }
}

pub struct TaskListProvider;

impl KeybindingProvider for TaskListProvider {
    fn get_context(&self) -> KeybindingContext {
        let mut bindings = vec![
            Keybinding::new("Tab", "select", "Select next task", Command::SelectNext),
            Keybinding::new("S-Tab", "", "Select previous task", Command::SelectPrev),
            Keybinding::new("Enter", "open", "Open subtasks of selected task", Command::FollowLink),
            Keybinding::new("g d", "", "Open detail view of selected task", Command::OpenDetail),
            Keybinding::new("Esc", "", "Clear selection", Command::Escape),
            Keybinding::new("g h", "board", "Go to the root board", Command::GoRoot),
            Keybinding::new("f", "filter", "Filter by project and due date", Command::Filter),
        ];
        bindings.extend(scrolling());
        bindings.extend(
            navigation()
                .into_iter()
                .filter(|b| b.command != Some(Command::GoRoot)),
        );
        KeybindingContext::new("Task List", bindings)
    }
}

pub struct ErrorViewProvider;

impl KeybindingProvider for ErrorViewProvider {
    fn get_context(&self) -> KeybindingContext {
        let mut bindings = navigation();
        if let Some(home) = bindings.iter_mut().find(|b| b.command == Some(Command::GoRoot)) {
            home.short_description = "home".to_string();
        }
        if let Some(back) = bindings
            .iter_mut()
            .find(|b| b.command == Some(Command::HistoryBack))
        {
            back.short_description = "back".to_string();
        }
        KeybindingContext::new("Error", bindings)
    }
}
