use thiserror::Error;

use crate::sync_types::{ProductSnapshot, SyncIntent, SystemKind};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Product with SKU {sku} was not found in {system}")]
    NotFound { system: SystemKind, sku: String },
    #[error("{system} rejected the write. {}{message}", .status.map(|s| format!("Status {s}. ")).unwrap_or_default())]
    RemoteWrite { system: SystemKind, status: Option<u16>, message: String },
    #[error("{system} does not support this operation. {message}")]
    Unsupported { system: SystemKind, message: String },
    #[error("Error communicating with {system}. {message}")]
    Backend { system: SystemKind, message: String },
}

impl CatalogError {
    pub fn system(&self) -> SystemKind {
        match self {
            Self::NotFound { system, .. } |
            Self::RemoteWrite { system, .. } |
            Self::Unsupported { system, .. } |
            Self::Backend { system, .. } => *system,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[allow(async_fn_in_trait)]
pub trait ProductCatalog {
    /// Which system this catalog fronts
    fn system(&self) -> SystemKind;

    /// Read the current state of the product with the given SKU. Returns [`CatalogError::NotFound`] if the SKU does
    /// not exist in this system.
    async fn fetch_snapshot(&self, sku: &str) -> Result<ProductSnapshot, CatalogError>;

    /// Carry out a single write. Any non-success response from the remote system is reported as
    /// [`CatalogError::RemoteWrite`].
    async fn apply_intent(&self, intent: &SyncIntent) -> Result<(), CatalogError>;
}
