//! Incremental search over task content.
//!
//! A query typed entirely in lowercase matches case-insensitively; any
//! uppercase character makes the match case-sensitive.

use crate::task::Task;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
    case_insensitive: bool,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let case_insensitive = text == text.to_lowercase();
        Self {
            text,
            case_insensitive,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    pub fn matches(&self, content: &str) -> bool {
        if self.case_insensitive {
            content.to_lowercase().contains(&self.text)
        } else {
            content.contains(&self.text)
        }
    }

    /// Matching tasks ordered by column, keeping input order within a column.
    pub fn matching<'a>(&self, tasks: &[&'a Task]) -> Vec<&'a Task> {
        let mut matches: Vec<&'a Task> = tasks
            .iter()
            .copied()
            .filter(|task| self.matches(&task.content))
            .collect();
        matches.sort_by_key(|task| task.column());
        matches
    }
}

/// Active query plus the cursor into its ordered matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    query: Option<SearchQuery>,
    match_index: Option<usize>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a search from prompt input; an empty or cancelled prompt leaves
    /// no query but still resets the cursor.
    pub fn begin(&mut self, text: Option<String>) {
        self.query = text.filter(|t| !t.is_empty()).map(SearchQuery::new);
        self.match_index = Some(0);
    }

    pub fn clear(&mut self) {
        self.query = None;
        self.match_index = None;
    }

    pub fn clear_match_index(&mut self) {
        self.match_index = None;
    }

    pub fn query(&self) -> Option<&SearchQuery> {
        self.query.as_ref()
    }

    pub fn match_index(&self) -> Option<usize> {
        self.match_index
    }

    pub fn is_navigating(&self) -> bool {
        self.query.is_some() && self.match_index.is_some()
    }

    pub fn next(&mut self, match_count: usize) {
        if let (Some(idx), true) = (self.match_index, match_count > 0) {
            self.match_index = Some((idx + 1) % match_count);
        }
    }

    pub fn prev(&mut self, match_count: usize) {
        if let (Some(idx), true) = (self.match_index, match_count > 0) {
            self.match_index = Some((idx + match_count - 1) % match_count);
        }
    }

    /// Point an active cursor at `index`; does nothing while not navigating.
    pub fn focus(&mut self, index: usize) {
        if self.match_index.is_some() {
            self.match_index = Some(index);
        }
    }

    /// Keep the cursor inside the match list after the list shrinks.
    pub fn clamp(&mut self, match_count: usize) {
        if let Some(idx) = self.match_index {
            if match_count > 0 && idx >= match_count {
                self.match_index = Some(match_count - 1);
            }
        }
    }

    pub fn current<'a>(&self, matches: &[&'a Task]) -> Option<&'a Task> {
        self.match_index.and_then(|idx| matches.get(idx).copied())
    }
}
