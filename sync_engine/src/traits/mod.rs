//! # Remote systems
//!
//! The sync engine never talks to Erply or Voog itself. Each system is hidden behind a [`ProductCatalog`], which knows
//! how to read a [`crate::ProductSnapshot`] for a SKU and how to carry out a [`crate::SyncIntent`].
//!
//! Authentication (Erply session keys, Voog API tokens), warehouse aggregation and the vendor wire formats are all
//! the catalog implementation's business.
mod product_catalog;

pub use product_catalog::{CatalogError, ProductCatalog};
