use rust_decimal::Decimal;
use sync_engine::{
    FieldSelection,
    FieldValue,
    ProductStatus,
    SyncApi,
    SyncDirection,
    SyncField,
    SyncRequest,
    SystemKind,
    WriteMechanism,
};

use crate::support::{at, erply_product, voog_product, MemoryCatalog};

mod support;

fn api(erply: MemoryCatalog, voog: MemoryCatalog) -> SyncApi<MemoryCatalog, MemoryCatalog> {
    let _ = env_logger::try_init();
    SyncApi::new(erply, voog)
}

#[tokio::test]
async fn erply_to_voog_converges() {
    let mut erply = erply_product("RZ-1", 12);
    erply.name = Some("Safety razor, chrome".into());
    let api = api(MemoryCatalog::new(erply), MemoryCatalog::new(voog_product("RZ-1", 4)));
    let request = SyncRequest::new("RZ-1", SyncDirection::ErplyToVoog);

    let report = api.sync_sku(&request).await.expect("sync failed");
    assert!(report.is_success());
    assert_eq!(report.applied.len(), 2);
    let voog = api.website().product();
    assert_eq!(voog.stock, Some(12));
    assert_eq!(voog.name.as_deref(), Some("Safety razor, chrome"));
    assert!(api.back_office().writes().is_empty());

    let plan = api.plan(&request).await.expect("plan failed");
    assert!(plan.is_empty(), "second run should be a no-op: {:?}", plan.intents);
}

#[tokio::test]
async fn voog_to_erply_stock_becomes_a_write_off() {
    let api = api(MemoryCatalog::new(erply_product("RZ-1", 10)), MemoryCatalog::new(voog_product("RZ-1", 7)));
    let request = SyncRequest::new("RZ-1", SyncDirection::VoogToErply);

    let report = api.sync_sku(&request).await.expect("sync failed");
    assert_eq!(report.applied.len(), 1);
    let intent = &report.applied[0];
    assert_eq!(intent.target, SystemKind::BackOffice);
    assert_eq!(intent.target_id, 101);
    assert_eq!(intent.mechanism, WriteMechanism::WriteOff { amount: 3, reason_id: 1 });
    assert_eq!(api.back_office().product().stock, Some(7));
    assert!(api.plan(&request).await.unwrap().is_empty());
}

#[tokio::test]
async fn both_directions_follow_the_newest_edit() {
    let mut erply = erply_product("RZ-1", 10);
    erply.updated_at = Some(at(1_700_000_000));
    let mut voog = voog_product("RZ-1", 8);
    voog.status = Some(ProductStatus::Inactive);
    voog.updated_at = Some(at(1_700_000_500));
    let api = api(MemoryCatalog::new(erply), MemoryCatalog::new(voog));
    let request = SyncRequest::new("RZ-1", SyncDirection::Both);

    let report = api.sync_sku(&request).await.expect("sync failed");
    assert!(report.is_success());
    let erply = api.back_office().product();
    assert_eq!(erply.status, Some(ProductStatus::Inactive));
    // Stock always follows the Erply ledger
    assert_eq!(erply.stock, Some(10));
    assert_eq!(api.website().product().stock, Some(10));
    assert_eq!(api.back_office().writes().len(), 1);
    assert!(api.plan(&request).await.unwrap().is_empty());
}

#[tokio::test]
async fn sales_recorded_in_erply_survive_a_two_way_sync() {
    let mut erply = erply_product("RZ-1", 9);
    erply.updated_at = Some(at(1_700_000_000));
    let mut voog = voog_product("RZ-1", 10);
    voog.updated_at = Some(at(1_700_000_500));
    let api = api(MemoryCatalog::new(erply), MemoryCatalog::new(voog));
    let request = SyncRequest::new("RZ-1", SyncDirection::Both).with_selection(FieldSelection::new([SyncField::Stock]));

    let report = api.sync_sku(&request).await.expect("sync failed");
    assert_eq!(report.applied.len(), 1);
    assert_eq!(report.applied[0].target, SystemKind::Website);
    assert!(api.back_office().writes().is_empty());
    assert_eq!(api.back_office().product().stock, Some(9));
    assert_eq!(api.website().product().stock, Some(9));
}

#[tokio::test]
async fn dry_run_writes_nothing() {
    let api = api(MemoryCatalog::new(erply_product("RZ-1", 5)), MemoryCatalog::new(voog_product("RZ-1", 0)));
    let request = SyncRequest::new("RZ-1", SyncDirection::ErplyToVoog).with_dry_run(true);

    let report = api.sync_sku(&request).await.expect("sync failed");
    assert!(report.dry_run);
    assert_eq!(report.planned.len(), 1);
    assert!(report.applied.is_empty());
    assert_eq!(api.website().product().stock, Some(0));
}

#[tokio::test]
async fn failed_writes_do_not_stop_the_rest() {
    let mut erply = erply_product("RZ-1", 5);
    erply.status = Some(ProductStatus::Inactive);
    let voog = MemoryCatalog::new(voog_product("RZ-1", 2)).rejecting(SyncField::Stock);
    let api = api(MemoryCatalog::new(erply), voog);
    let request = SyncRequest::new("RZ-1", SyncDirection::ErplyToVoog);

    let report = api.sync_sku(&request).await.expect("sync failed");
    assert!(!report.is_success());
    assert_eq!(report.planned.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].intent.field, SyncField::Stock);
    assert!(report.failed[0].error.contains("422"));
    assert_eq!(report.applied.len(), 1);
    assert_eq!(api.website().product().status, Some(ProductStatus::Inactive));
}

#[tokio::test]
async fn price_only_moves_when_enabled() {
    let mut erply = erply_product("RZ-1", 5);
    erply.price = Some(Decimal::new(1999, 2));
    let api = api(MemoryCatalog::new(erply), MemoryCatalog::new(voog_product("RZ-1", 5)));
    let fields = FieldSelection::new([SyncField::Price, SyncField::Stock]);

    let request = SyncRequest::new("RZ-1", SyncDirection::ErplyToVoog).with_selection(fields.clone());
    assert!(api.plan(&request).await.unwrap().is_empty());

    let request = request.with_selection(fields.with_price_enabled(true));
    let report = api.sync_sku(&request).await.expect("sync failed");
    assert_eq!(report.applied.len(), 1);
    assert_eq!(report.applied[0].new_value, FieldValue::Price(Decimal::new(1999, 2)));
    assert_eq!(api.website().product().price, Some(Decimal::new(1999, 2)));
}

#[tokio::test]
async fn stock_override_replaces_the_erply_figure() {
    let api = api(MemoryCatalog::new(erply_product("RZ-1", 5)), MemoryCatalog::new(voog_product("RZ-1", 5)));
    let request = SyncRequest::stock_refresh("RZ-1").with_stock_override(Some(40));

    let report = api.sync_sku(&request).await.expect("sync failed");
    assert_eq!(report.applied.len(), 1);
    assert_eq!(api.website().product().stock, Some(40));
    assert_eq!(api.back_office().product().stock, Some(5));
}

#[tokio::test]
async fn missing_products_are_reported_per_system() {
    let api1 = api(MemoryCatalog::new(erply_product("RZ-1", 5)), MemoryCatalog::empty(SystemKind::Website));
    let err = api1.sync_sku(&SyncRequest::stock_refresh("RZ-1")).await.expect_err("voog product is missing");
    assert_eq!(err.missing_product(), Some(SystemKind::Website));

    let api2 = api(MemoryCatalog::empty(SystemKind::BackOffice), MemoryCatalog::new(voog_product("RZ-1", 5)));
    let err = api2.sync_sku(&SyncRequest::stock_refresh("RZ-1")).await.expect_err("erply product is missing");
    assert_eq!(err.missing_product(), Some(SystemKind::BackOffice));
    assert_eq!(err.to_string(), "Product with SKU RZ-1 was not found in erply");
}
