use anyhow::{Context, Result};
use erply_tools::{ErplyApi, ErplyConfig};
use log::*;
use serde_json::json;
use sync_engine::{stock_intent, ProductCatalog, SystemKind};
use sync_server::integrations::{ErplyCatalog, WarehouseScoped};

use crate::{sync_command::whole_units, CreateProductParams, SetStockParams};

fn erply_api() -> Result<ErplyApi> {
    let config = ErplyConfig::new_from_env()?;
    Ok(ErplyApi::new(config)?)
}

/// Moves the Erply stock for a SKU to an absolute figure with a single registration or write-off.
pub async fn set_stock(params: SetStockParams) -> Result<()> {
    let sku = params.sku.trim();
    let target = whole_units(params.stock, "stock")?;
    let mut catalog = ErplyCatalog::new(erply_api()?);
    if let Some(id) = params.warehouse_id {
        catalog = catalog.for_warehouse(id);
    }
    let snapshot = catalog.fetch_snapshot(sku).await?;
    println!("Current={}, target={target}", snapshot.stock.unwrap_or(0));
    match stock_intent(SystemKind::BackOffice, snapshot.remote_id, sku, snapshot.stock, target) {
        None => println!("No change made"),
        Some(intent) => {
            info!("🧾️ {intent}");
            catalog.apply_intent(&intent).await.with_context(|| format!("Could not set stock for SKU {sku}"))?;
            println!("{}", json!({"ok": true, "applied_delta": intent.delta()}));
        },
    }
    Ok(())
}

pub async fn create_product(params: CreateProductParams) -> Result<()> {
    let api = erply_api()?;
    let product_id = api.create_product(params.sku.trim(), params.name.trim()).await?;
    println!("{}", json!({"ok": true, "product_id": product_id}));
    Ok(())
}
