use chrono::{DateTime, Utc};
use evs_common::json::{as_decimal, as_rounded_i64};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

//--------------------------------------     VoogStatus       ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoogStatus {
    Live,
    Draft,
}

impl VoogStatus {
    pub fn from_active(active: bool) -> Self {
        if active {
            Self::Live
        } else {
            Self::Draft
        }
    }

    /// Anything other than `live` counts as a draft.
    pub fn parse(s: &str) -> Self {
        Self::from_active(s.trim().eq_ignore_ascii_case("live"))
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Draft => "draft",
        }
    }
}

//--------------------------------------     VoogProduct       --------------------------------------------------------
/// A product as returned by the Voog ecommerce API. Fields the sync does not interpret are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoogProduct {
    pub id: i64,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub stock: Value,
    #[serde(default)]
    pub price: Value,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VoogProduct {
    pub fn has_sku(&self, sku: &str) -> bool {
        self.sku.as_deref() == Some(sku)
    }

    /// Fractional stock is rounded. `null` means stock is not tracked.
    pub fn stock(&self) -> Option<i64> {
        as_rounded_i64(&self.stock)
    }

    pub fn price(&self) -> Option<Decimal> {
        as_decimal(&self.price)
    }

    pub fn status(&self) -> Option<VoogStatus> {
        self.status.as_deref().map(VoogStatus::parse)
    }
}

//--------------------------------------     BulkUpdate       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkAction {
    pub target_field: String,
    pub action: String,
    pub value: Value,
}

impl BulkAction {
    pub fn set<S: Into<String>>(field: S, value: Value) -> Self {
        Self { target_field: field.into(), action: "set".to_string(), value }
    }
}

/// Body of `PUT /products`: every action is applied to every target product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkUpdate {
    pub actions: Vec<BulkAction>,
    pub target_ids: Vec<i64>,
}
