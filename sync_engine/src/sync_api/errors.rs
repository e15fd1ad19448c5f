use thiserror::Error;

use crate::{reconciler::ReconcileError, sync_types::SystemKind, traits::CatalogError};

#[derive(Debug, Clone, Error)]
pub enum SyncError {
    #[error("{0}")]
    Catalog(#[from] CatalogError),
    #[error("{0}")]
    Reconcile(#[from] ReconcileError),
}

impl SyncError {
    /// If the sync failed because the product does not exist in one of the systems, returns that system.
    pub fn missing_product(&self) -> Option<SystemKind> {
        match self {
            Self::Catalog(CatalogError::NotFound { system, .. }) => Some(*system),
            _ => None,
        }
    }
}
