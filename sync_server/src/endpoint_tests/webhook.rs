use actix_web::{http::StatusCode, test, test::TestRequest, App};
use serde_json::{json, Value};
use sync_engine::{CatalogError, ProductSnapshot, SyncApi, SystemKind};

use super::{
    helpers::{post_order, MemCatalog},
    mocks::MockCatalog,
};
use crate::{
    config::WebhookConfig,
    data_objects::{OrderWebhook, WebhookItem},
    errors::ServerError,
    order_webhook::process_order,
    routes::healthz,
};

fn catalogs() -> (MemCatalog, MemCatalog) {
    let erply = MemCatalog::new(SystemKind::BackOffice, &[("RZ-1", 8), ("BL-5", 3)]);
    let voog = MemCatalog::new(SystemKind::Website, &[("RZ-1", 10), ("BL-5", 3)]);
    (erply, voog)
}

const ORDER: &str = r#"{
    "order_id": "V-1001",
    "items": [{"sku": "RZ-1", "quantity": 1}, {"sku": "BL-5", "quantity": 1}, {"sku": "RZ-1", "quantity": 2}]
}"#;

#[actix_web::test]
async fn health_endpoint() {
    let _ = env_logger::try_init().ok();
    let app = test::init_service(App::new().service(healthz)).await;
    let req = TestRequest::get().uri("/healthz").to_request();
    let res = test::call_service(&app, req).await;
    assert!(res.status().is_success());
    let body = test::read_body_json::<Value, _>(res).await;
    assert_eq!(body, json!({"ok": true}));
}

#[actix_web::test]
async fn order_refreshes_voog_stock() {
    let _ = env_logger::try_init().ok();
    let (erply, voog) = catalogs();
    let (status, body) = post_order(ORDER, erply.clone(), voog.clone(), WebhookConfig::default()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "ok": true,
            "order_id": "V-1001",
            "write_enabled": false,
            "write_strategy": "sync_only",
            "applied": {},
            "refreshed": {"BL-5": 3, "RZ-1": 8}
        })
    );
    assert_eq!(voog.stock("RZ-1"), Some(8));
    assert_eq!(erply.stock("RZ-1"), Some(8));
    assert!(erply.warehouses().is_empty());
}

#[actix_web::test]
async fn enabled_writes_echo_the_decrements() {
    let _ = env_logger::try_init().ok();
    let (erply, voog) = catalogs();
    let config = WebhookConfig { write_enabled: true, write_strategy: "write_off".into() };
    let (_, body) = post_order(ORDER, erply.clone(), voog, config).await;
    assert_eq!(body["applied"], json!({"BL-5": 1.0, "RZ-1": 3.0}));
    assert_eq!(body["write_strategy"], json!("write_off"));
    // Decrements are only logged
    assert_eq!(erply.stock("RZ-1"), Some(8));
}

#[actix_web::test]
async fn sync_only_strategy_writes_nothing() {
    let _ = env_logger::try_init().ok();
    let (erply, voog) = catalogs();
    let config = WebhookConfig { write_enabled: true, write_strategy: "sync_only".into() };
    let (_, body) = post_order(ORDER, erply, voog, config).await;
    assert_eq!(body["applied"], json!({}));
    assert_eq!(body["write_enabled"], json!(true));
}

#[actix_web::test]
async fn skus_missing_from_voog_are_still_reported() {
    let _ = env_logger::try_init().ok();
    let erply = MemCatalog::new(SystemKind::BackOffice, &[("RZ-1", 8), ("GIFT", 40)]);
    let voog = MemCatalog::new(SystemKind::Website, &[("RZ-1", 10)]);
    let order = r#"{"items": [{"sku": "GIFT", "quantity": 1}, {"sku": "RZ-1", "quantity": 1}]}"#;
    let (_, body) = post_order(order, erply, voog.clone(), WebhookConfig::default()).await;
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["order_id"], Value::Null);
    assert_eq!(body["refreshed"], json!({"GIFT": 40, "RZ-1": 8}));
    assert_eq!(voog.stock("RZ-1"), Some(8));
}

#[actix_web::test]
async fn skus_missing_from_erply_fail_the_order() {
    let _ = env_logger::try_init().ok();
    let (erply, voog) = catalogs();
    let order = r#"{"order_id": "V-1002", "items": [{"sku": "NOPE", "quantity": 1}]}"#;
    let (status, body) = post_order(order, erply, voog, WebhookConfig::default()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": false, "error": "Product with SKU NOPE was not found in erply"}));
}

#[actix_web::test]
async fn order_can_pin_a_warehouse() {
    let _ = env_logger::try_init().ok();
    let (erply, voog) = catalogs();
    let order = r#"{"items": [{"sku": "BL-5", "quantity": 2}], "warehouse_id": 4}"#;
    let (_, body) = post_order(order, erply.clone(), voog, WebhookConfig::default()).await;
    assert_eq!(body["ok"], json!(true));
    assert_eq!(erply.warehouses(), vec![4]);
}

#[actix_web::test]
async fn malformed_orders_are_rejected() {
    let _ = env_logger::try_init().ok();
    let (erply, voog) = catalogs();
    let (status, body) = post_order(r#"{"order_id": 5}"#, erply, voog, WebhookConfig::default()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], json!(false));
    assert!(body["error"].as_str().unwrap().starts_with("Could not read request body"));
}

#[actix_web::test]
async fn failed_voog_write_fails_the_order() {
    let _ = env_logger::try_init().ok();
    let mut erply = MockCatalog::new();
    erply.expect_system().return_const(SystemKind::BackOffice);
    erply.expect_fetch_snapshot().returning(|sku| {
        let mut p = ProductSnapshot::new(SystemKind::BackOffice, 101, sku);
        p.stock = Some(5);
        Ok(p)
    });
    erply.expect_apply_intent().never();
    let mut voog = MockCatalog::new();
    voog.expect_system().return_const(SystemKind::Website);
    voog.expect_fetch_snapshot().returning(|sku| {
        let mut p = ProductSnapshot::new(SystemKind::Website, 7, sku);
        p.stock = Some(2);
        Ok(p)
    });
    voog.expect_apply_intent().times(1).returning(|_| {
        Err(CatalogError::RemoteWrite { system: SystemKind::Website, status: Some(500), message: "boom".into() })
    });

    let api = SyncApi::new(erply, voog);
    let order = OrderWebhook {
        order_id: Some("V-1003".into()),
        items: vec![WebhookItem { sku: "RZ-1".into(), quantity: 1.0 }],
        warehouse_id: None,
    };
    let err = process_order(&api, &order, &WebhookConfig::default()).await.expect_err("voog write fails");
    assert!(matches!(err, ServerError::WriteFailed { count: 1, .. }));
    assert_eq!(err.to_string(), "Could not apply 1 change(s). voog rejected the write. Status 500. boom");
}
