use erply_tools::{ErplyApi, ErplyApiError, ErplyProduct, ProductUpdate};
use log::*;
use sync_engine::{
    CatalogError,
    FieldValue,
    ProductCatalog,
    ProductSnapshot,
    ProductStatus,
    SyncField,
    SyncIntent,
    SystemKind,
    WriteMechanism,
};

use crate::integrations::WarehouseScoped;

const SYSTEM: SystemKind = SystemKind::BackOffice;

#[derive(Clone)]
pub struct ErplyCatalog {
    api: ErplyApi,
}

impl ErplyCatalog {
    pub fn new(api: ErplyApi) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ErplyApi {
        &self.api
    }
}

impl WarehouseScoped for ErplyCatalog {
    fn for_warehouse(&self, warehouse_id: i64) -> Self {
        Self { api: self.api.with_warehouse_id(warehouse_id) }
    }
}

/// Builds the back-office snapshot for `sku`. `stock` is already aggregated over warehouses.
pub fn erply_snapshot(sku: &str, product: &ErplyProduct, stock: i64) -> ProductSnapshot {
    let mut snapshot = ProductSnapshot::new(SYSTEM, product.product_id, sku);
    snapshot.name = product.name.clone();
    snapshot.stock = Some(stock);
    snapshot.price = product.price;
    snapshot.status = Some(if product.is_active() { ProductStatus::Active } else { ProductStatus::Inactive });
    snapshot.updated_at = product.updated_at();
    snapshot
}

fn read_error(e: ErplyApiError) -> CatalogError {
    CatalogError::Backend { system: SYSTEM, message: e.to_string() }
}

fn write_error(e: ErplyApiError) -> CatalogError {
    CatalogError::RemoteWrite { system: SYSTEM, status: e.http_status(), message: e.to_string() }
}

impl ProductCatalog for ErplyCatalog {
    fn system(&self) -> SystemKind {
        SYSTEM
    }

    async fn fetch_snapshot(&self, sku: &str) -> Result<ProductSnapshot, CatalogError> {
        let product = self
            .api
            .find_product_by_sku(sku)
            .await
            .map_err(read_error)?
            .ok_or_else(|| CatalogError::NotFound { system: SYSTEM, sku: sku.to_string() })?;
        let stock = self.api.stock_for_product(product.product_id).await.map_err(read_error)?;
        Ok(erply_snapshot(sku, &product, stock))
    }

    async fn apply_intent(&self, intent: &SyncIntent) -> Result<(), CatalogError> {
        let id = intent.target_id;
        debug!("🧾️ Applying {intent}");
        let result = match (intent.field, &intent.new_value, intent.mechanism) {
            (SyncField::Stock, _, WriteMechanism::Registration { amount }) => {
                self.api.save_inventory_registration(id, amount).await
            },
            (SyncField::Stock, _, WriteMechanism::WriteOff { amount, reason_id }) => {
                self.api.save_inventory_write_off(id, amount, reason_id).await
            },
            (SyncField::Price, FieldValue::Price(price), _) => {
                self.api.update_product(id, &ProductUpdate::price(*price)).await
            },
            (SyncField::Status, FieldValue::Status(status), _) => {
                self.api.update_product(id, &ProductUpdate::status(status.is_active())).await
            },
            (field, value, mechanism) => {
                return Err(CatalogError::Unsupported {
                    system: SYSTEM,
                    message: format!("Cannot write {field} = {value} ({mechanism}) to Erply"),
                });
            },
        };
        result.map_err(write_error)
    }
}
