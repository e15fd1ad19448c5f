use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum VoogApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid REST request: {0}")]
    RestRequestError(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
}

impl VoogApiError {
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::QueryError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
