#![allow(dead_code)]

use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
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

/// A catalog holding a single product in memory. Writes change the stored snapshot, so a second sync sees the
/// result of the first.
pub struct MemoryCatalog {
    system: SystemKind,
    product: Mutex<Option<ProductSnapshot>>,
    reject: Option<SyncField>,
    writes: Mutex<Vec<SyncIntent>>,
}

impl MemoryCatalog {
    pub fn new(product: ProductSnapshot) -> Self {
        Self { system: product.system, product: Mutex::new(Some(product)), reject: None, writes: Mutex::new(vec![]) }
    }

    pub fn empty(system: SystemKind) -> Self {
        Self { system, product: Mutex::new(None), reject: None, writes: Mutex::new(vec![]) }
    }

    /// Every write to `field` will fail with a remote error
    pub fn rejecting(mut self, field: SyncField) -> Self {
        self.reject = Some(field);
        self
    }

    pub fn product(&self) -> ProductSnapshot {
        self.product.lock().unwrap().clone().expect("catalog is empty")
    }

    pub fn writes(&self) -> Vec<SyncIntent> {
        self.writes.lock().unwrap().clone()
    }
}

impl ProductCatalog for MemoryCatalog {
    fn system(&self) -> SystemKind {
        self.system
    }

    async fn fetch_snapshot(&self, sku: &str) -> Result<ProductSnapshot, CatalogError> {
        self.product
            .lock()
            .unwrap()
            .clone()
            .filter(|p| p.sku == sku)
            .ok_or_else(|| CatalogError::NotFound { system: self.system, sku: sku.to_string() })
    }

    async fn apply_intent(&self, intent: &SyncIntent) -> Result<(), CatalogError> {
        assert_eq!(intent.target, self.system, "intent sent to the wrong catalog");
        if self.reject == Some(intent.field) {
            return Err(CatalogError::RemoteWrite {
                system: self.system,
                status: Some(422),
                message: format!("{} is read-only", intent.field),
            });
        }
        let mut guard = self.product.lock().unwrap();
        let product = guard.as_mut().expect("catalog is empty");
        match (intent.field, &intent.new_value, intent.mechanism) {
            (SyncField::Stock, _, WriteMechanism::Registration { .. } | WriteMechanism::WriteOff { .. }) => {
                let delta = intent.delta().unwrap_or_default();
                product.stock = Some(product.stock.unwrap_or(0) + delta);
            },
            (SyncField::Stock, FieldValue::Quantity(q), WriteMechanism::Set) => product.stock = Some(*q),
            (SyncField::Price, FieldValue::Price(p), _) => product.price = Some(*p),
            (SyncField::Status, FieldValue::Status(s), _) => product.status = Some(*s),
            (SyncField::Name, FieldValue::Text(s), _) => product.name = Some(s.clone()),
            (SyncField::Sku, FieldValue::Text(s), _) => product.sku = s.clone(),
            (field, value, _) => panic!("unexpected write of {value} to {field}"),
        }
        self.writes.lock().unwrap().push(intent.clone());
        Ok(())
    }
}

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().expect("valid timestamp")
}

pub fn erply_product(sku: &str, stock: i64) -> ProductSnapshot {
    let mut p = ProductSnapshot::new(SystemKind::BackOffice, 101, sku);
    p.name = Some("Safety razor".into());
    p.stock = Some(stock);
    p.price = Some(Decimal::new(2490, 2));
    p.status = Some(ProductStatus::Active);
    p
}

pub fn voog_product(sku: &str, stock: i64) -> ProductSnapshot {
    let mut p = ProductSnapshot::new(SystemKind::Website, 7, sku);
    p.name = Some("Safety razor".into());
    p.stock = Some(stock);
    p.price = Some(Decimal::new(2490, 2));
    p.status = Some(ProductStatus::Active);
    p
}
