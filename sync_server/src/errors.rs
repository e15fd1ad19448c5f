use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use erply_tools::ErplyApiError;
use evs_common::MissingEnvVars;
use sync_engine::{CatalogError, SyncError};
use thiserror::Error;
use voog_tools::VoogApiError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(#[from] MissingEnvVars),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("{0}")]
    SyncError(#[from] SyncError),
    #[error("Could not apply {count} change(s). {message}")]
    WriteFailed { count: usize, message: String },
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl From<CatalogError> for ServerError {
    fn from(e: CatalogError) -> Self {
        Self::SyncError(SyncError::Catalog(e))
    }
}

impl From<ErplyApiError> for ServerError {
    fn from(e: ErplyApiError) -> Self {
        Self::InitializeError(format!("Erply client: {e}"))
    }
}

impl From<VoogApiError> for ServerError {
    fn from(e: VoogApiError) -> Self {
        Self::InitializeError(format!("Voog client: {e}"))
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::SyncError(e) if e.missing_product().is_some() => StatusCode::NOT_FOUND,
            Self::SyncError(_) => StatusCode::BAD_GATEWAY,
            Self::WriteFailed { .. } => StatusCode::BAD_GATEWAY,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "ok": false, "error": self.to_string() }).to_string())
    }
}
