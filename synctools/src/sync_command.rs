use anyhow::{anyhow, Result};
use erply_tools::ErplyApi;
use log::*;
use sync_engine::{CatalogError, FieldSelection, SyncApi, SyncError, SyncField, SyncRequest, SystemKind};
use sync_server::{
    config::SyncConfig,
    integrations::{ErplyCatalog, VoogCatalog},
};
use voog_tools::VoogApi;

use crate::{
    formatting::{format_plan, format_report},
    SyncParams,
};

pub async fn run_sync(params: SyncParams) -> Result<()> {
    let mut config = SyncConfig::from_env()?;
    if let Some(id) = params.warehouse_id {
        config.erply.warehouse_id = Some(id);
    }
    if let Some(sum) = params.sum_all_warehouses {
        config.erply.sum_all_warehouses = sum;
    }
    info!(
        "🪛️ Erply stock is read with warehouse_id={:?}, sum_all={}",
        config.erply.warehouse_id, config.erply.sum_all_warehouses
    );
    let request = build_request(&params, params.enable_price || config.price_enabled)?;
    let erply = ErplyCatalog::new(ErplyApi::new(config.erply)?);
    let voog = VoogCatalog::new(VoogApi::new(config.voog)?);
    let api = SyncApi::new(erply, voog);

    let plan = api.plan(&request).await?;
    println!("{}", format_plan(&plan));
    if request.dry_run {
        println!("Dry run: nothing was written");
        return Ok(());
    }
    let report = api.execute(&plan).await;
    println!("{}", format_report(&report));
    if report.is_success() {
        Ok(())
    } else {
        Err(anyhow!("{} of {} change(s) failed for SKU {}", report.failed.len(), report.planned.len(), report.sku))
    }
}

/// Without an explicit field list the standard selection is used, plus price when it is enabled.
pub fn build_request(params: &SyncParams, price_enabled: bool) -> Result<SyncRequest> {
    let selection = if params.fields.is_empty() {
        let mut fields = FieldSelection::standard().fields().collect::<Vec<_>>();
        if price_enabled {
            fields.push(SyncField::Price);
        }
        FieldSelection::new(fields)
    } else {
        FieldSelection::new(params.fields.iter().copied())
    };
    let stock_override = params.stock_override.map(|s| whole_units(s, "stock-override")).transpose()?;
    Ok(SyncRequest::new(params.sku.trim(), params.direction)
        .with_selection(selection.with_price_enabled(price_enabled))
        .with_stock_override(stock_override)
        .with_dry_run(params.dry_run))
}

/// Rounds a quantity given on the command line. Values that cannot be a stock figure are rejected.
pub fn whole_units(value: f64, flag: &str) -> Result<i64> {
    let rounded = value.round();
    if rounded.is_finite() && rounded >= i64::MIN as f64 && rounded < i64::MAX as f64 {
        Ok(rounded as i64)
    } else {
        Err(anyhow!("--{flag} {value} is not a usable stock quantity"))
    }
}

/// 2 when the product is missing from Voog, 3 when it is missing from Erply, 1 for everything else.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    let missing = err.downcast_ref::<SyncError>().and_then(SyncError::missing_product).or_else(|| {
        err.downcast_ref::<CatalogError>().filter(|e| e.is_not_found()).map(CatalogError::system)
    });
    match missing {
        Some(SystemKind::Website) => 2,
        Some(SystemKind::BackOffice) => 3,
        None => 1,
    }
}
