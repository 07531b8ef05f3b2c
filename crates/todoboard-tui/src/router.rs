use std::fmt;

use todoboard_core::TodoboardError;
use todoboard_domain::TaskId;

/// Failure shown by the error view. Displays the status text when present,
/// otherwise the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteError {
    pub status_text: Option<String>,
    pub message: Option<String>,
}

impl RouteError {
    pub fn not_found(path: &str) -> Self {
        Self {
            status_text: Some("Not Found".to_string()),
            message: Some(format!("No route matches {path}")),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status_text: None,
            message: Some(message.into()),
        }
    }
}

impl From<&TodoboardError> for RouteError {
    fn from(err: &TodoboardError) -> Self {
        Self {
            status_text: Some(err.status_text().to_string()),
            message: Some(err.to_string()),
        }
    }
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .status_text
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.message.as_deref())
            .unwrap_or("Unknown error");
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`: kanban of top-level tasks.
    Root,
    /// `/todos`: table of top-level tasks.
    TaskList,
    /// `/todos/{id}`: kanban of one task's subtasks.
    Detail(TaskId),
    Error(RouteError),
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim();
        let segments: Vec<&str> = trimmed
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        match segments.as_slice() {
            [] => Route::Root,
            ["todos"] => Route::TaskList,
            ["todos", id] => Route::Detail((*id).to_string()),
            _ => Route::Error(RouteError::not_found(trimmed)),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Root => "/".to_string(),
            Route::TaskList => "/todos".to_string(),
            Route::Detail(id) => format!("/todos/{id}"),
            Route::Error(_) => "!".to_string(),
        }
    }

    /// Parent scope of the tasks shown on this route.
    pub fn parent_id(&self) -> Option<&str> {
        match self {
            Route::Detail(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_kanban(&self) -> bool {
        matches!(self, Route::Root | Route::Detail(_))
    }
}

/// Current route plus back/forward history.
#[derive(Debug)]
pub struct Router {
    current: Route,
    back: Vec<Route>,
    forward: Vec<Route>,
}

impl Router {
    pub fn new(initial: Route) -> Self {
        Self {
            current: initial,
            back: Vec::new(),
            forward: Vec::new(),
        }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    /// Push a new route. Returns false when already there.
    pub fn navigate(&mut self, route: Route) -> bool {
        if route == self.current {
            return false;
        }
        tracing::debug!("Navigating {} -> {}", self.current.path(), route.path());
        let previous = std::mem::replace(&mut self.current, route);
        self.back.push(previous);
        self.forward.clear();
        true
    }

    /// Replace the current route without touching history.
    pub fn replace(&mut self, route: Route) {
        self.current = route;
    }

    pub fn back(&mut self) -> bool {
        match self.back.pop() {
            Some(route) => {
                let current = std::mem::replace(&mut self.current, route);
                self.forward.push(current);
                true
            }
            None => false,
        }
    }

    pub fn forward(&mut self) -> bool {
        match self.forward.pop() {
            Some(route) => {
                let current = std::mem::replace(&mut self.current, route);
                self.back.push(current);
                true
            }
            None => false,
        }
    }

    pub fn can_go_back(&self) -> bool {
        !self.back.is_empty()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.forward.is_empty()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Route::Root)
    }
}
