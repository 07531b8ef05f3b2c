use thiserror::Error;

#[derive(Error, Debug)]
pub enum TodoboardError {
    #[error("Remote service error: {0}")]
    Remote(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TodoboardError {
    /// Short status line used by the error view when the error has no better description.
    pub fn status_text(&self) -> &'static str {
        match self {
            TodoboardError::Remote(_) => "Bad Gateway",
            TodoboardError::NotFound(_) => "Not Found",
            TodoboardError::Validation(_) => "Bad Request",
            TodoboardError::Io(_)
            | TodoboardError::Serialization(_)
            | TodoboardError::Internal(_) => "Internal Error",
        }
    }
}
