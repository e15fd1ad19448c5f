use evs_common::json::decimal_to_json;
use log::*;
use serde_json::{json, Map};
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
use voog_tools::{BulkAction, VoogApi, VoogApiError, VoogProduct, VoogStatus};

const SYSTEM: SystemKind = SystemKind::Website;

/// Where the website-only content lives in a Voog product
const WEBSITE_ONLY_FIELDS: [(SyncField, &str); 3] =
    [(SyncField::Description, "description"), (SyncField::Seo, "meta_description"), (SyncField::Images, "assets")];

#[derive(Clone)]
pub struct VoogCatalog {
    api: VoogApi,
}

impl VoogCatalog {
    pub fn new(api: VoogApi) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &VoogApi {
        &self.api
    }
}

pub fn voog_snapshot(product: &VoogProduct) -> ProductSnapshot {
    let sku = product.sku.clone().unwrap_or_default();
    let mut snapshot = ProductSnapshot::new(SYSTEM, product.id, sku);
    snapshot.name = product.name.clone();
    snapshot.stock = product.stock();
    snapshot.price = product.price();
    snapshot.status =
        product.status().map(|s| if s.is_live() { ProductStatus::Active } else { ProductStatus::Inactive });
    snapshot.updated_at = product.updated_at;
    for (field, key) in WEBSITE_ONLY_FIELDS {
        if let Some(value) = product.extra.get(key).filter(|v| !v.is_null()) {
            snapshot.extras.insert(field.to_string(), value.clone());
        }
    }
    snapshot
}

fn read_error(e: VoogApiError) -> CatalogError {
    CatalogError::Backend { system: SYSTEM, message: e.to_string() }
}

fn write_error(e: VoogApiError) -> CatalogError {
    CatalogError::RemoteWrite { system: SYSTEM, status: e.http_status(), message: e.to_string() }
}

impl ProductCatalog for VoogCatalog {
    fn system(&self) -> SystemKind {
        SYSTEM
    }

    async fn fetch_snapshot(&self, sku: &str) -> Result<ProductSnapshot, CatalogError> {
        self.api
            .find_product_by_sku(sku)
            .await
            .map_err(read_error)?
            .map(|p| voog_snapshot(&p))
            .ok_or_else(|| CatalogError::NotFound { system: SYSTEM, sku: sku.to_string() })
    }

    async fn apply_intent(&self, intent: &SyncIntent) -> Result<(), CatalogError> {
        let id = intent.target_id;
        debug!("🛒️ Applying {intent}");
        let result = match (intent.field, &intent.new_value, intent.mechanism) {
            (SyncField::Stock, FieldValue::Quantity(stock), WriteMechanism::Set) => {
                self.api.update_stock(id, *stock).await
            },
            (SyncField::Price, FieldValue::Price(price), _) => {
                self.api.bulk_update(&[id], vec![BulkAction::set("price", decimal_to_json(*price))]).await
            },
            (SyncField::Status, FieldValue::Status(status), _) => {
                let status = VoogStatus::from_active(status.is_active());
                self.api.bulk_update(&[id], vec![BulkAction::set("status", json!(status.as_str()))]).await
            },
            (SyncField::Name | SyncField::Sku, FieldValue::Text(text), _) => {
                let mut fields = Map::new();
                fields.insert(intent.field.to_string(), json!(text));
                self.api.update_product_fields(id, fields).await
            },
            (field, value, mechanism) => {
                return Err(CatalogError::Unsupported {
                    system: SYSTEM,
                    message: format!("Cannot write {field} = {value} ({mechanism}) to Voog"),
                });
            },
        };
        result.map(|_| ()).map_err(write_error)
    }
}

#[cfg(test)]
mod test {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    #[test]
    fn snapshot_from_product() {
        let product: VoogProduct = serde_json::from_value(json!({
            "id": 7,
            "sku": "RZ-1",
            "name": "Safety razor",
            "status": "draft",
            "stock": "3",
            "price": 24.9,
            "description": "<p>Chrome</p>",
            "meta_description": null,
            "assets": [{"id": 1}]
        }))
        .expect("valid product");
        let snapshot = voog_snapshot(&product);
        assert_eq!(snapshot.system, SystemKind::Website);
        assert_eq!(snapshot.remote_id, 7);
        assert_eq!(snapshot.stock, Some(3));
        assert_eq!(snapshot.price, Some(Decimal::new(249, 1)));
        assert_eq!(snapshot.status, Some(ProductStatus::Inactive));
        assert_eq!(snapshot.extras.get("description"), Some(&json!("<p>Chrome</p>")));
        assert!(!snapshot.extras.contains_key("seo"));
        assert_eq!(snapshot.value_of(SyncField::Images), FieldValue::Opaque(json!([{"id": 1}])));
    }

    #[test]
    fn untracked_stock_is_missing() {
        let product: VoogProduct = serde_json::from_value(json!({"id": 8, "sku": "RZ-2", "status": "live"})).unwrap();
        let snapshot = voog_snapshot(&product);
        assert_eq!(snapshot.stock, None);
        assert_eq!(snapshot.status, Some(ProductStatus::Active));
        assert_eq!(snapshot.updated_at, None);
    }
}
