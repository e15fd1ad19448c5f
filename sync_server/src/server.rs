use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use erply_tools::ErplyApi;
use log::*;
use voog_tools::VoogApi;

use crate::{
    config::{ServerConfig, SyncConfig},
    errors::ServerError,
    integrations::{ErplyCatalog, VoogCatalog},
    routes::{healthz, VoogOrderWebhookRoute},
};

pub async fn run_server(config: ServerConfig, sync: SyncConfig) -> Result<(), ServerError> {
    let erply = ErplyCatalog::new(ErplyApi::new(sync.erply)?);
    let voog = VoogCatalog::new(VoogApi::new(sync.voog)?);
    let srv = create_server_instance(config, erply, voog)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

/// Builds the HTTP server. The catalogs are cloned into every worker; clones share the HTTP clients and the cached
/// Erply session.
pub fn create_server_instance(
    config: ServerConfig,
    erply: ErplyCatalog,
    voog: VoogCatalog,
) -> Result<Server, ServerError> {
    info!(
        "💻️ Webhook writes to Erply are {} (strategy: {})",
        if config.webhook.decrements_stock() { "logged" } else { "off" },
        config.webhook.write_strategy
    );
    let webhook = config.webhook.clone();
    let srv = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("sync::access_log"))
            .app_data(json_config())
            .app_data(web::Data::new(erply.clone()))
            .app_data(web::Data::new(voog.clone()))
            .app_data(web::Data::new(webhook.clone()))
            .service(healthz)
            .service(VoogOrderWebhookRoute::<ErplyCatalog, VoogCatalog>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Malformed JSON bodies get the same `{"ok": false, "error": ...}` shape as every other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ServerError::InvalidRequestBody(err.to_string()).into())
}
