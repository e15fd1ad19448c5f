use thiserror::Error;

/// Erply error codes meaning the session key is no longer usable
const SESSION_EXPIRED_CODES: [i64; 3] = [1054, 1055, 1056];

#[derive(Debug, Clone, Error)]
pub enum ErplyApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid request: {0}")]
    RequestError(String),
    #[error("Invalid response: {0}")]
    ResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("Erply API error: code={code} msg={}", .field.as_deref().unwrap_or("(none)"))]
    ApiError { code: i64, field: Option<String> },
    #[error("Erply did not return a session key")]
    NoSessionKey,
}

impl ErplyApiError {
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::ApiError { code, .. } if SESSION_EXPIRED_CODES.contains(code))
    }

    /// The HTTP status, if the request failed at the HTTP level
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::QueryError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
