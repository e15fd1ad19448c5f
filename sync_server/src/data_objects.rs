use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookItem {
    pub sku: String,
    /// Units purchased
    pub quantity: f64,
}

/// The order notification Voog sends when a purchase is made
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderWebhook {
    #[serde(default)]
    pub order_id: Option<String>,
    pub items: Vec<WebhookItem>,
    /// Erply warehouse to read and write stock in, for this order only
    #[serde(default)]
    pub warehouse_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookResult {
    pub ok: bool,
    pub order_id: Option<String>,
    pub write_enabled: bool,
    pub write_strategy: String,
    /// Erply stock decrements per SKU
    pub applied: BTreeMap<String, f64>,
    /// The Erply stock figure each SKU was refreshed with
    pub refreshed: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JsonResponse {
    pub fn success() -> Self {
        Self { ok: true, error: None }
    }

    pub fn failure<S: ToString>(error: S) -> Self {
        Self { ok: false, error: Some(error.to_string()) }
    }
}
