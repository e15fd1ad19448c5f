//! A small client for the Erply back-office API.
//!
//! Erply exposes a single endpoint that takes form-encoded POSTs. The `request` parameter names the operation and
//! every call after `verifyUser` carries a session key. [`ErplyApi`] caches the key and re-authenticates once if
//! Erply reports that it has expired.
mod api;
mod config;
mod data_objects;
mod error;

pub use api::ErplyApi;
pub use config::ErplyConfig;
pub use data_objects::{
    pick_default_group,
    pick_default_vat_rate,
    pick_default_warehouse,
    resolve_stock,
    ErplyProduct,
    ErplyResponse,
    ProductUpdate,
    ResponseStatus,
    StockRecord,
};
pub use error::ErplyApiError;
