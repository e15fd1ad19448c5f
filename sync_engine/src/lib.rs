//! Sync Engine
//!
//! The core of the Erply ↔ Voog product sync. It is vendor-agnostic: it knows which fields may move between the
//! back-office and the website, and in which direction, but nothing about how either system is reached.
//!
//! The library is divided into three parts:
//! 1. The field policy table ([`mod@policy`]) and the shared data types ([`mod@sync_types`]).
//! 2. The [`Reconciler`], a pure function from two product snapshots to a list of [`SyncIntent`]s.
//! 3. [`SyncApi`], which fetches snapshots through a pair of [`ProductCatalog`]s, reconciles them and applies the
//!    resulting intents. Concrete catalogs for Erply and Voog live in the server crate.
pub mod policy;
pub mod reconciler;
pub mod sync_types;

mod sync_api;
mod traits;

pub use policy::{FieldPolicy, FieldSelection, PolicyDirection, PolicyError, PolicyTable};
pub use reconciler::{stock_intent, ReconcileError, Reconciler};
pub use sync_api::{FailedIntent, SyncApi, SyncError, SyncPlan, SyncReport, SyncRequest};
pub use sync_types::{
    FieldValue,
    InvalidDirectionError,
    ProductSnapshot,
    ProductStatus,
    SyncDirection,
    SyncField,
    SyncIntent,
    SystemKind,
    WriteMechanism,
    WRITE_OFF_REASON_ID,
};
pub use traits::{CatalogError, ProductCatalog};
