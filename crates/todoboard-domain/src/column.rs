use serde::{Deserialize, Serialize};

pub const KANBAN_TODO: &str = "KANBAN_TODO";
pub const KANBAN_BLOCKED: &str = "KANBAN_BLOCKED";
pub const KANBAN_IN_PROGRESS: &str = "KANBAN_IN_PROGRESS";
pub const KANBAN_DONE: &str = "KANBAN_DONE";

/// Labels that encode column membership, in precedence order.
pub const RESERVED_LABELS: [&str; 4] =
    [KANBAN_TODO, KANBAN_BLOCKED, KANBAN_IN_PROGRESS, KANBAN_DONE];

/// Board columns, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum KanbanColumn {
    Unset,
    Todo,
    Blocked,
    InProgress,
    Done,
}

impl KanbanColumn {
    pub const ALL: [KanbanColumn; 5] = [
        KanbanColumn::Unset,
        KanbanColumn::Todo,
        KanbanColumn::Blocked,
        KanbanColumn::InProgress,
        KanbanColumn::Done,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            KanbanColumn::Unset => "Not Set",
            KanbanColumn::Todo => "Todo",
            KanbanColumn::Blocked => "Blocked",
            KanbanColumn::InProgress => "In Progress",
            KanbanColumn::Done => "Done",
        }
    }

    /// The reserved label that places a task in this column, if any.
    pub fn label(self) -> Option<&'static str> {
        match self {
            KanbanColumn::Unset => None,
            KanbanColumn::Todo => Some(KANBAN_TODO),
            KanbanColumn::Blocked => Some(KANBAN_BLOCKED),
            KanbanColumn::InProgress => Some(KANBAN_IN_PROGRESS),
            KanbanColumn::Done => Some(KANBAN_DONE),
        }
    }

    /// Column for a label set: the first reserved label in precedence order
    /// wins regardless of where it sits in `labels`.
    pub fn for_labels<S: AsRef<str>>(labels: &[S]) -> Self {
        Self::ALL[1..]
            .iter()
            .copied()
            .find(|column| {
                column
                    .label()
                    .is_some_and(|reserved| labels.iter().any(|l| l.as_ref() == reserved))
            })
            .unwrap_or(KanbanColumn::Unset)
    }

    pub fn left(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn right(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }
}

pub fn is_reserved_label(label: &str) -> bool {
    RESERVED_LABELS.contains(&label)
}

/// Label set placing a task in `target`: every reserved label is stripped,
/// other labels keep their order, and the target's label is appended.
pub fn relabel_for_column<S: AsRef<str>>(labels: &[S], target: KanbanColumn) -> Vec<String> {
    let mut next: Vec<String> = labels
        .iter()
        .map(|l| l.as_ref())
        .filter(|l| !is_reserved_label(l))
        .map(str::to_string)
        .collect();
    if let Some(label) = target.label() {
        next.push(label.to_string());
    }
    next
}
