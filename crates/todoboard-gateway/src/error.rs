use thiserror::Error;
use todoboard_core::TodoboardError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("server responded {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("task {0} not found")]
    TaskNotFound(String),

    #[error("invalid request: {0}")]
    Invalid(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            GatewayError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

impl From<GatewayError> for TodoboardError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::TaskNotFound(id) => TodoboardError::NotFound(format!("task {id}")),
            GatewayError::Invalid(msg) => TodoboardError::Validation(msg),
            other => TodoboardError::Remote(other.to_string()),
        }
    }
}
