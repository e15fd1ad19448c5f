use std::sync::Arc;

use evs_common::USER_AGENT;
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Map, Value};

use crate::{BulkAction, BulkUpdate, VoogApiError, VoogConfig, VoogProduct};

const PAGE_SIZE: &str = "50";

#[derive(Clone)]
pub struct VoogApi {
    config: VoogConfig,
    client: Arc<Client>,
}

impl VoogApi {
    pub fn new(config: VoogConfig) -> Result<Self, VoogApiError> {
        let mut headers = HeaderMap::with_capacity(4);
        let val = HeaderValue::from_str(config.api_token.reveal().as_str())
            .map_err(|e| VoogApiError::Initialization(e.to_string()))?;
        headers.insert("X-API-TOKEN", val);
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        headers.insert("User-Agent", HeaderValue::from_static(USER_AGENT));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| VoogApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url())
    }

    /// Sends a REST request. An empty response body is read as JSON `null`.
    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<B>,
    ) -> Result<T, VoogApiError> {
        let url = self.url(path);
        trace!("🛒️ Sending REST query: {method} {url}");
        let mut req = self.client.request(method, url);
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| VoogApiError::RestRequestError(e.to_string()))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| VoogApiError::RestResponseError(e.to_string()))?;
        if !status.is_success() {
            return Err(VoogApiError::QueryError { status: status.as_u16(), message: text });
        }
        trace!("🛒️ REST query successful. {status}");
        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(text).map_err(|e| VoogApiError::JsonError(e.to_string()))
    }

    /// Looks a product up by exact SKU. Voog's filter is not guaranteed to be exact, so the results are checked again.
    pub async fn find_product_by_sku(&self, sku: &str) -> Result<Option<VoogProduct>, VoogApiError> {
        debug!("🛒️ Looking up Voog product {sku}");
        let params = [("q.product.sku.$eq", sku), ("per_page", PAGE_SIZE)];
        let products = self.rest_query::<Vec<VoogProduct>, ()>(Method::GET, "/products", &params, None).await?;
        let product = products.into_iter().find(|p| p.has_sku(sku));
        if product.is_none() {
            debug!("🛒️ No Voog product has SKU {sku}");
        }
        Ok(product)
    }

    /// Applies the same actions to every product in `product_ids`.
    pub async fn bulk_update(&self, product_ids: &[i64], actions: Vec<BulkAction>) -> Result<Value, VoogApiError> {
        let body = BulkUpdate { actions, target_ids: product_ids.to_vec() };
        debug!("🛒️ Bulk update: {}", serde_json::to_string(&body).unwrap_or_else(|e| e.to_string()));
        self.rest_query::<Value, BulkUpdate>(Method::PUT, "/products", &[], Some(body)).await
    }

    pub async fn update_product_fields(
        &self,
        product_id: i64,
        fields: Map<String, Value>,
    ) -> Result<Value, VoogApiError> {
        let path = format!("/products/{product_id}");
        debug!("🛒️ Updating product {product_id}: {}", Value::Object(fields.clone()));
        self.rest_query::<Value, Value>(Method::PUT, &path, &[], Some(Value::Object(fields))).await
    }

    /// Sets the stock of one product. Tries the bulk endpoint first and falls back to a single-product update if that
    /// fails. If both fail, the single-product error is returned.
    pub async fn update_stock(&self, product_id: i64, stock: i64) -> Result<Value, VoogApiError> {
        match self.bulk_update(&[product_id], vec![BulkAction::set("stock", json!(stock))]).await {
            Ok(v) => Ok(v),
            Err(e) => {
                warn!("🛒️ Bulk stock update for product {product_id} failed ({e}). Trying single-product update.");
                let mut fields = Map::new();
                fields.insert("stock".to_string(), json!(stock));
                self.update_product_fields(product_id, fields).await
            },
        }
    }
}
