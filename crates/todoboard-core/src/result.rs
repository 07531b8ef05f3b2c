use crate::error::TodoboardError;

pub type TodoboardResult<T> = Result<T, TodoboardError>;
