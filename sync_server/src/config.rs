use erply_tools::ErplyConfig;
use evs_common::{EnvReader, MissingEnvVars};
use log::*;
use voog_tools::VoogConfig;

const DEFAULT_SYNC_HOST: &str = "127.0.0.1";
const DEFAULT_SYNC_PORT: u16 = 8089;
pub const SYNC_ONLY_STRATEGY: &str = "sync_only";

//--------------------------------------     SyncConfig       ---------------------------------------------------------
/// Everything needed to talk to both systems
#[derive(Debug, Clone, Default)]
pub struct SyncConfig {
    pub erply: ErplyConfig,
    pub voog: VoogConfig,
    /// Price is only synced when this is set
    pub price_enabled: bool,
}

impl SyncConfig {
    /// Reads both systems' settings from the environment. All missing variables are reported together.
    pub fn from_env() -> Result<Self, MissingEnvVars> {
        let mut env = EnvReader::from_env();
        let config = Self::from_reader(&mut env);
        env.finish()?;
        Ok(config)
    }

    pub fn from_reader(env: &mut EnvReader) -> Self {
        let erply = ErplyConfig::from_reader(env);
        let voog = VoogConfig::from_reader(env);
        let price_enabled = env.flag("SYNC_PRICE_ENABLED", false);
        Self { erply, voog, price_enabled }
    }
}

//--------------------------------------     WebhookConfig       ------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    pub write_enabled: bool,
    pub write_strategy: String,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self { write_enabled: false, write_strategy: SYNC_ONLY_STRATEGY.to_string() }
    }
}

impl WebhookConfig {
    pub fn from_reader(env: &EnvReader) -> Self {
        let write_enabled = env.flag("ERPLY_WRITE_ENABLED", false);
        let write_strategy = env
            .optional("ERPLY_WRITE_STRATEGY")
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_else(|| SYNC_ONLY_STRATEGY.into());
        Self { write_enabled, write_strategy }
    }

    /// True if orders should produce Erply stock decrements. The decrements are only logged.
    pub fn decrements_stock(&self) -> bool {
        self.write_enabled && self.write_strategy != SYNC_ONLY_STRATEGY
    }
}

//--------------------------------------     ServerConfig       -------------------------------------------------------
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub webhook: WebhookConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: DEFAULT_SYNC_HOST.to_string(), port: DEFAULT_SYNC_PORT, webhook: WebhookConfig::default() }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        Self::from_reader(&EnvReader::from_env())
    }

    pub fn from_reader(env: &EnvReader) -> Self {
        let host = env.optional("SYNC_HOST").unwrap_or_else(|| DEFAULT_SYNC_HOST.into());
        let port = env.parsed::<u16>("SYNC_PORT").unwrap_or_else(|| {
            debug!("🪛️ SYNC_PORT not set (or invalid). Using the default, {DEFAULT_SYNC_PORT}");
            DEFAULT_SYNC_PORT
        });
        let webhook = WebhookConfig::from_reader(env);
        Self { host, port, webhook }
    }
}
