use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use serde_json::Value;
use sync_engine::{
    CatalogError,
    FieldValue,
    ProductCatalog,
    ProductSnapshot,
    SyncField,
    SyncIntent,
    SystemKind,
    WriteMechanism,
};

use crate::{
    config::WebhookConfig,
    integrations::WarehouseScoped,
    routes::{healthz, VoogOrderWebhookRoute},
    server::json_config,
};

/// Products keyed by SKU. Clones share their products, like clones of the real catalogs share their HTTP clients.
#[derive(Clone)]
pub struct MemCatalog {
    system: SystemKind,
    products: Arc<Mutex<HashMap<String, ProductSnapshot>>>,
    warehouses: Arc<Mutex<Vec<i64>>>,
}

impl MemCatalog {
    pub fn new(system: SystemKind, stock: &[(&str, i64)]) -> Self {
        let products = stock
            .iter()
            .enumerate()
            .map(|(i, (sku, qty))| {
                let mut p = ProductSnapshot::new(system, 100 + i as i64, *sku);
                p.stock = Some(*qty);
                (sku.to_string(), p)
            })
            .collect();
        Self { system, products: Arc::new(Mutex::new(products)), warehouses: Arc::new(Mutex::new(vec![])) }
    }

    pub fn stock(&self, sku: &str) -> Option<i64> {
        self.products.lock().unwrap().get(sku).and_then(|p| p.stock)
    }

    /// Warehouses this catalog has been scoped to, in order
    pub fn warehouses(&self) -> Vec<i64> {
        self.warehouses.lock().unwrap().clone()
    }
}

impl WarehouseScoped for MemCatalog {
    fn for_warehouse(&self, warehouse_id: i64) -> Self {
        self.warehouses.lock().unwrap().push(warehouse_id);
        self.clone()
    }
}

impl ProductCatalog for MemCatalog {
    fn system(&self) -> SystemKind {
        self.system
    }

    async fn fetch_snapshot(&self, sku: &str) -> Result<ProductSnapshot, CatalogError> {
        self.products
            .lock()
            .unwrap()
            .get(sku)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound { system: self.system, sku: sku.to_string() })
    }

    async fn apply_intent(&self, intent: &SyncIntent) -> Result<(), CatalogError> {
        let mut products = self.products.lock().unwrap();
        let product = products.get_mut(&intent.sku).expect("intent for unknown product");
        match (intent.field, &intent.new_value, intent.mechanism) {
            (SyncField::Stock, FieldValue::Quantity(q), WriteMechanism::Set) => product.stock = Some(*q),
            (SyncField::Stock, _, _) => product.stock = Some(product.stock.unwrap_or(0) + intent.delta().unwrap_or(0)),
            (field, value, _) => panic!("unexpected write of {value} to {field}"),
        }
        Ok(())
    }
}

pub async fn post_order(
    body: &str,
    erply: MemCatalog,
    voog: MemCatalog,
    config: WebhookConfig,
) -> (StatusCode, Value) {
    let app = App::new()
        .app_data(json_config())
        .app_data(web::Data::new(erply))
        .app_data(web::Data::new(voog))
        .app_data(web::Data::new(config))
        .service(healthz)
        .service(VoogOrderWebhookRoute::<MemCatalog, MemCatalog>::new());
    let service = test::init_service(app).await;
    let req = TestRequest::post()
        .uri("/voog/order-webhook")
        .insert_header(("Content-Type", "application/json"))
        .set_payload(body.to_string())
        .to_request();
    let res = test::call_service(&service, req).await;
    let status = res.status();
    let body = test::read_body_json::<Value, _>(res).await;
    (status, body)
}
