use chrono::{DateTime, Utc};
use evs_common::json::{as_decimal, as_f64, as_i64, as_text, is_truthy};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ErplyApiError;

//--------------------------------------     ErplyResponse       ------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseStatus {
    pub request: Option<String>,
    pub error_code: i64,
    pub error_field: Option<String>,
}

/// The envelope every Erply call returns: a `status` block and a list of `records`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErplyResponse {
    pub status: ResponseStatus,
    pub records: Vec<Value>,
    session_key: Option<String>,
}

impl ErplyResponse {
    pub fn from_value(value: Value) -> Self {
        let status = &value["status"];
        let status = ResponseStatus {
            request: as_text(&status["request"]),
            error_code: as_i64(&status["errorCode"]).unwrap_or(0),
            error_field: as_text(&status["errorField"]),
        };
        let session_key = as_text(&value["sessionKey"]);
        let records = match value.get("records") {
            Some(Value::Array(records)) => records.clone(),
            _ => Vec::new(),
        };
        Self { status, records, session_key }
    }

    /// Converts a non-zero `errorCode` into an error.
    pub fn into_result(self) -> Result<Self, ErplyApiError> {
        if self.status.error_code == 0 {
            Ok(self)
        } else {
            Err(ErplyApiError::ApiError { code: self.status.error_code, field: self.status.error_field })
        }
    }

    /// `verifyUser` returns the key in the first record, but some accounts put it at the top level.
    pub fn session_key(&self) -> Option<String> {
        self.records.first().and_then(|r| as_text(&r["sessionKey"])).or_else(|| self.session_key.clone())
    }
}

//--------------------------------------     ErplyProduct       -------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErplyProduct {
    pub product_id: i64,
    pub code: Option<String>,
    pub code2: Option<String>,
    pub code3: Option<String>,
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub status: Option<String>,
    /// Unix seconds
    pub last_modified: Option<i64>,
}

impl ErplyProduct {
    /// Returns `None` for records without a product id.
    pub fn from_record(record: &Value) -> Option<Self> {
        let product_id = as_i64(&record["productID"]).or_else(|| as_i64(&record["id"])).filter(|id| *id > 0)?;
        Some(Self {
            product_id,
            code: as_text(&record["code"]),
            code2: as_text(&record["code2"]),
            code3: as_text(&record["code3"]),
            name: as_text(&record["name"]),
            price: as_decimal(&record["price"]),
            status: as_text(&record["status"]).or_else(|| as_text(&record["active"])),
            last_modified: as_i64(&record["lastModified"]),
        })
    }

    /// True if any of the product codes is `sku`, or if the record carries no codes at all.
    pub fn matches_sku(&self, sku: &str) -> bool {
        let codes = [&self.code, &self.code2, &self.code3];
        codes.iter().all(|c| c.is_none()) || codes.iter().any(|c| c.as_deref() == Some(sku))
    }

    /// Products without a status are active.
    pub fn is_active(&self) -> bool {
        match &self.status {
            None => true,
            Some(s) => matches!(s.trim().to_ascii_uppercase().as_str(), "ACTIVE" | "1" | "TRUE"),
        }
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.last_modified.filter(|t| *t > 0).and_then(|t| DateTime::from_timestamp(t, 0))
    }
}

//--------------------------------------     StockRecord       --------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    pub product_id: i64,
    pub warehouse_id: Option<i64>,
    pub amount: f64,
}

const STOCK_FIELDS: [&str; 4] = ["amountInStock", "free", "amount", "total"];

impl StockRecord {
    pub fn from_record(record: &Value) -> Option<Self> {
        let product_id = as_i64(&record["productID"]).or_else(|| as_i64(&record["id"]))?;
        let amount = STOCK_FIELDS.iter().find_map(|f| as_f64(&record[*f])).unwrap_or(0.0);
        Some(Self { product_id, warehouse_id: as_i64(&record["warehouseID"]), amount })
    }
}

/// The stock figure for `product_id`, rounded to a whole number.
///
/// When `single_warehouse` is set, the records were already filtered by warehouse and the last one wins. Otherwise
/// all records for the product are summed. No records means no stock.
pub fn resolve_stock(records: &[StockRecord], product_id: i64, single_warehouse: bool) -> i64 {
    let amounts = records.iter().filter(|r| r.product_id == product_id).map(|r| r.amount);
    let total = if single_warehouse { amounts.last().unwrap_or(0.0) } else { amounts.sum() };
    total.round() as i64
}

//--------------------------------------     Defaults       -----------------------------------------------------------
fn record_id(record: &Value, key: &str) -> Option<i64> {
    as_i64(&record[key]).or_else(|| as_i64(&record["id"])).filter(|id| *id > 0)
}

fn pick_id(records: &[Value], key: &str, preferred: &str) -> i64 {
    records
        .iter()
        .filter(|r| is_truthy(&r[preferred]))
        .find_map(|r| record_id(r, key))
        .or_else(|| records.first().and_then(|r| record_id(r, key)))
        .unwrap_or(1)
}

/// First active warehouse, else the first warehouse, else 1
pub fn pick_default_warehouse(records: &[Value]) -> i64 {
    pick_id(records, "warehouseID", "active")
}

/// First active product group, else the first group, else 1
pub fn pick_default_group(records: &[Value]) -> i64 {
    pick_id(records, "productGroupID", "active")
}

/// The default VAT rate, else the first rate, else 1
pub fn pick_default_vat_rate(records: &[Value]) -> i64 {
    pick_id(records, "vatRateID", "isDefault")
}

//--------------------------------------     ProductUpdate       ------------------------------------------------------
/// Fields to change with `saveProduct`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub price: Option<Decimal>,
    pub active: Option<bool>,
}

impl ProductUpdate {
    pub fn price(price: Decimal) -> Self {
        Self { price: Some(price), active: None }
    }

    pub fn status(active: bool) -> Self {
        Self { price: None, active: Some(active) }
    }

    pub fn is_empty(&self) -> bool {
        self.price.is_none() && self.active.is_none()
    }

    pub fn form_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(2);
        if let Some(price) = self.price {
            params.push(("price", price.normalize().to_string()));
        }
        if let Some(active) = self.active {
            params.push(("status", if active { "ACTIVE" } else { "INACTIVE" }.to_string()));
        }
        params
    }
}
