//! Handling for Voog order notifications.
//!
//! An order lowers stock on the website. Voog is not the stock ledger, so every SKU in the order is refreshed from
//! Erply straight away. Writing the sale to Erply is switched off unless `ERPLY_WRITE_ENABLED` is set together with a
//! write strategy other than `sync_only`; even then the decrement is only logged and echoed back.
use std::collections::BTreeMap;

use log::*;
use sync_engine::{ProductCatalog, SyncApi, SyncError, SyncRequest, SystemKind};

use crate::{
    config::WebhookConfig,
    data_objects::{OrderWebhook, WebhookItem, WebhookResult},
    errors::ServerError,
};

/// Sums quantities per SKU. Items without a SKU are dropped.
pub fn aggregate_items(items: &[WebhookItem]) -> BTreeMap<String, f64> {
    items.iter().fold(BTreeMap::new(), |mut totals, item| {
        let sku = item.sku.trim();
        if sku.is_empty() {
            warn!("💻️ Ignoring order line without a SKU ({} units)", item.quantity);
        } else {
            *totals.entry(sku.to_string()).or_insert(0.0) += item.quantity;
        }
        totals
    })
}

pub async fn process_order<B, W>(
    api: &SyncApi<B, W>,
    order: &OrderWebhook,
    config: &WebhookConfig,
) -> Result<WebhookResult, ServerError>
where
    B: ProductCatalog,
    W: ProductCatalog,
{
    let order_id = order.order_id.as_deref().unwrap_or("(no id)");
    let totals = aggregate_items(&order.items);
    info!("💻️ Order {order_id} touches {} SKU(s)", totals.len());
    let mut applied = BTreeMap::new();
    if config.decrements_stock() {
        for (sku, quantity) in &totals {
            info!(
                "💻️ [INTENT] Would decrement Erply stock for SKU {sku} by {quantity} using strategy={}",
                config.write_strategy
            );
            applied.insert(sku.clone(), *quantity);
        }
    }
    let mut refreshed = BTreeMap::new();
    for sku in totals.keys() {
        let stock = refresh_stock(api, sku).await?;
        refreshed.insert(sku.clone(), stock);
    }
    Ok(WebhookResult {
        ok: true,
        order_id: order.order_id.clone(),
        write_enabled: config.write_enabled,
        write_strategy: config.write_strategy.clone(),
        applied,
        refreshed,
    })
}

/// Copies the Erply stock figure for `sku` to Voog and returns it. A SKU that Voog does not sell is not an error; its
/// Erply stock is still reported.
pub async fn refresh_stock<B, W>(api: &SyncApi<B, W>, sku: &str) -> Result<i64, ServerError>
where
    B: ProductCatalog,
    W: ProductCatalog,
{
    let request = SyncRequest::stock_refresh(sku);
    match api.plan(&request).await {
        Ok(plan) => {
            let stock = plan.back_office.stock.unwrap_or(0);
            let report = api.execute(&plan).await;
            if let Some(failure) = report.failed.first() {
                return Err(ServerError::WriteFailed { count: report.failed.len(), message: failure.error.clone() });
            }
            debug!("💻️ [{sku}] Refreshed with Erply stock {stock}");
            Ok(stock)
        },
        Err(SyncError::Catalog(e)) if e.is_not_found() && e.system() == SystemKind::Website => {
            warn!("💻️ [{sku}] has no Voog product. Nothing to refresh.");
            let snapshot = api.back_office().fetch_snapshot(sku).await?;
            Ok(snapshot.stock.unwrap_or(0))
        },
        Err(e) => Err(e.into()),
    }
}
