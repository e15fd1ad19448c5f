use std::sync::Arc;

use evs_common::{Secret, USER_AGENT};
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{
    data_objects::{pick_default_group, pick_default_vat_rate, pick_default_warehouse, resolve_stock},
    ErplyApiError,
    ErplyConfig,
    ErplyProduct,
    ErplyResponse,
    ProductUpdate,
    StockRecord,
};

/// Form parameters that are never written to the log
const SECRET_PARAMS: [&str; 3] = ["username", "password", "sessionKey"];

#[derive(Clone)]
pub struct ErplyApi {
    config: ErplyConfig,
    client: Arc<Client>,
    session: Arc<Mutex<Option<Secret<String>>>>,
}

impl ErplyApi {
    pub fn new(config: ErplyConfig) -> Result<Self, ErplyApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        headers.insert("User-Agent", HeaderValue::from_static(USER_AGENT));
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ErplyApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client), session: Arc::new(Mutex::new(None)) })
    }

    pub fn config(&self) -> &ErplyConfig {
        &self.config
    }

    /// A copy of this client with `warehouse_id` as its pinned warehouse. Stock is still summed over all warehouses if
    /// the configuration says so. The HTTP client and the session are shared with `self`.
    pub fn with_warehouse_id(&self, warehouse_id: i64) -> Self {
        let mut config = self.config.clone();
        config.warehouse_id = Some(warehouse_id);
        Self { config, client: Arc::clone(&self.client), session: Arc::clone(&self.session) }
    }

    /// Sends one form-encoded request without a session key.
    pub async fn post_form(&self, request: &str, params: &[(&str, String)]) -> Result<ErplyResponse, ErplyApiError> {
        let mut form = Vec::with_capacity(params.len() + 2);
        form.push(("clientCode", self.config.client_code.clone()));
        form.push(("request", request.to_string()));
        form.extend(params.iter().map(|(k, v)| (*k, v.clone())));
        trace!("🧾️ POST {} {request} {}", self.config.api_url, loggable(&form));
        let response = self
            .client
            .post(&self.config.api_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| ErplyApiError::RequestError(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| ErplyApiError::ResponseError(e.to_string()))?;
            return Err(ErplyApiError::QueryError { status, message });
        }
        let value = response.json::<Value>().await.map_err(|e| ErplyApiError::JsonError(e.to_string()))?;
        ErplyResponse::from_value(value).into_result()
    }

    /// Logs in with the configured credentials and returns a fresh session key.
    pub async fn verify_user(&self) -> Result<Secret<String>, ErplyApiError> {
        debug!("🧾️ Requesting a new Erply session for {}", self.config.username);
        let params = [
            ("username", self.config.username.clone()),
            ("password", self.config.password.reveal().clone()),
        ];
        let response = self.post_form("verifyUser", &params).await?;
        response.session_key().map(Secret::new).ok_or(ErplyApiError::NoSessionKey)
    }

    async fn session_key(&self) -> Result<Secret<String>, ErplyApiError> {
        let mut session = self.session.lock().await;
        if let Some(key) = session.as_ref() {
            return Ok(key.clone());
        }
        let key = self.verify_user().await?;
        *session = Some(key.clone());
        Ok(key)
    }

    async fn forget_session(&self) {
        *self.session.lock().await = None;
    }

    /// Sends an authenticated request. If Erply says the session has expired, a new session is started and the
    /// request is sent one more time.
    pub async fn request(&self, request: &str, params: &[(&str, String)]) -> Result<ErplyResponse, ErplyApiError> {
        match self.request_with_session(request, params).await {
            Err(e) if e.is_session_expired() => {
                info!("🧾️ Erply session expired. Logging in again.");
                self.forget_session().await;
                self.request_with_session(request, params).await
            },
            result => result,
        }
    }

    async fn request_with_session(
        &self,
        request: &str,
        params: &[(&str, String)],
    ) -> Result<ErplyResponse, ErplyApiError> {
        let key = self.session_key().await?;
        let mut all_params = Vec::with_capacity(params.len() + 1);
        all_params.push(("sessionKey", key.reveal().clone()));
        all_params.extend(params.iter().cloned());
        self.post_form(request, &all_params).await
    }

    /// All products whose codes match `sku`
    pub async fn find_products_by_sku(&self, sku: &str) -> Result<Vec<ErplyProduct>, ErplyApiError> {
        let response = self.request("getProducts", &[("code", sku.to_string())]).await?;
        let products = response
            .records
            .iter()
            .filter_map(ErplyProduct::from_record)
            .filter(|p| p.matches_sku(sku))
            .collect::<Vec<_>>();
        debug!("🧾️ {} Erply product(s) found for SKU {sku}", products.len());
        Ok(products)
    }

    pub async fn find_product_by_sku(&self, sku: &str) -> Result<Option<ErplyProduct>, ErplyApiError> {
        Ok(self.find_products_by_sku(sku).await?.into_iter().next())
    }

    /// Raw stock records. A `warehouseID` filter is sent when the configuration reads a single warehouse.
    pub async fn get_product_stock(&self, product_ids: &[i64]) -> Result<Vec<StockRecord>, ErplyApiError> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = product_ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(",");
        let mut params = vec![("productIDs", ids)];
        if let (Some(warehouse_id), true) = (self.config.warehouse_id, self.config.reads_single_warehouse()) {
            params.push(("warehouseID", warehouse_id.to_string()));
        }
        let response = self.request("getProductStock", &params).await?;
        let records = response.records.iter().filter_map(StockRecord::from_record).collect::<Vec<_>>();
        if records.is_empty() {
            warn!("🧾️ Erply returned no stock records for products {product_ids:?}");
        }
        Ok(records)
    }

    /// The stock figure for a single product, summed or pinned according to the configuration.
    pub async fn stock_for_product(&self, product_id: i64) -> Result<i64, ErplyApiError> {
        let records = self.get_product_stock(&[product_id]).await?;
        let stock = resolve_stock(&records, product_id, self.config.reads_single_warehouse());
        debug!(
            "🧾️ Stock for product {product_id}: {stock} (warehouse_id={:?}, sum_all={})",
            self.config.warehouse_id, self.config.sum_all_warehouses
        );
        Ok(stock)
    }

    pub async fn default_warehouse_id(&self) -> Result<i64, ErplyApiError> {
        let response = self.request("getWarehouses", &[]).await?;
        Ok(pick_default_warehouse(&response.records))
    }

    pub async fn default_group_id(&self) -> Result<i64, ErplyApiError> {
        let response = self.request("getProductGroups", &[]).await?;
        Ok(pick_default_group(&response.records))
    }

    pub async fn default_vat_rate_id(&self) -> Result<i64, ErplyApiError> {
        let response = self.request("getVatRates", &[]).await?;
        Ok(pick_default_vat_rate(&response.records))
    }

    /// The pinned warehouse, or the account's default warehouse
    pub async fn write_warehouse_id(&self) -> Result<i64, ErplyApiError> {
        match self.config.warehouse_id {
            Some(id) => Ok(id),
            None => self.default_warehouse_id().await,
        }
    }

    /// Records `amount` units of incoming stock
    pub async fn save_inventory_registration(&self, product_id: i64, amount: i64) -> Result<(), ErplyApiError> {
        let warehouse_id = self.write_warehouse_id().await?;
        let params = [
            ("warehouseID", warehouse_id.to_string()),
            ("productID1", product_id.to_string()),
            ("amount1", amount.to_string()),
        ];
        self.request("saveInventoryRegistration", &params).await?;
        info!("🧾️ Registered {amount} unit(s) of product {product_id} in warehouse {warehouse_id}");
        Ok(())
    }

    /// Writes off `amount` units of stock with the given reason
    pub async fn save_inventory_write_off(
        &self,
        product_id: i64,
        amount: i64,
        reason_id: u32,
    ) -> Result<(), ErplyApiError> {
        let warehouse_id = self.write_warehouse_id().await?;
        let params = [
            ("warehouseID", warehouse_id.to_string()),
            ("reasonID", reason_id.to_string()),
            ("productID1", product_id.to_string()),
            ("amount1", amount.to_string()),
        ];
        self.request("saveInventoryWriteOff", &params).await?;
        info!("🧾️ Wrote off {amount} unit(s) of product {product_id} in warehouse {warehouse_id}");
        Ok(())
    }

    pub async fn update_product(&self, product_id: i64, update: &ProductUpdate) -> Result<(), ErplyApiError> {
        if update.is_empty() {
            return Ok(());
        }
        let mut params = vec![("productID", product_id.to_string())];
        params.extend(update.form_params());
        self.request("saveProduct", &params).await?;
        info!("🧾️ Updated product {product_id}: {update:?}");
        Ok(())
    }

    /// Creates an active product in the default group and VAT rate. Returns the new product id, if Erply reported it.
    pub async fn create_product(&self, sku: &str, name: &str) -> Result<Option<i64>, ErplyApiError> {
        let group_id = self.default_group_id().await?;
        let vat_rate_id = self.default_vat_rate_id().await?;
        let params = [
            ("name", name.to_string()),
            ("code", sku.to_string()),
            ("groupID", group_id.to_string()),
            ("vatRateID", vat_rate_id.to_string()),
            ("status", "ACTIVE".to_string()),
        ];
        let response = self.request("saveProduct", &params).await?;
        let product_id = response.records.first().and_then(ErplyProduct::from_record).map(|p| p.product_id);
        info!("🧾️ Created Erply product {sku} ({name}) with id {product_id:?}");
        Ok(product_id)
    }
}

fn loggable(form: &[(&str, String)]) -> String {
    form.iter()
        .filter(|(k, _)| !SECRET_PARAMS.contains(k))
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}
