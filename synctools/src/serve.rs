use anyhow::Result;
use log::*;
use sync_server::{
    config::{ServerConfig, SyncConfig},
    server::run_server,
};

use crate::ServeParams;

pub async fn serve(params: ServeParams) -> Result<()> {
    let sync = SyncConfig::from_env()?;
    let mut config = ServerConfig::from_env_or_default();
    if let Some(host) = params.host {
        config.host = host;
    }
    if let Some(port) = params.port {
        config.port = port;
    }
    info!("🚀️ Starting server on {}:{}", config.host, config.port);
    run_server(config, sync).await?;
    Ok(())
}
