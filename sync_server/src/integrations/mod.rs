//! `ProductCatalog` implementations for the two systems the sync runs between.
pub mod erply;
pub mod voog;

pub use erply::ErplyCatalog;
pub use voog::VoogCatalog;

/// A back-office catalog that can be pointed at a specific warehouse for one request.
pub trait WarehouseScoped {
    fn for_warehouse(&self, warehouse_id: i64) -> Self;
}
