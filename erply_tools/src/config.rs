use std::time::Duration;

use evs_common::{EnvReader, MissingEnvVars, Secret};
use log::*;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Clone, Default)]
pub struct ErplyConfig {
    pub client_code: String,
    pub username: String,
    pub password: Secret<String>,
    pub api_url: String,
    /// Stock is read from, and written to, this warehouse when set
    pub warehouse_id: Option<i64>,
    /// Sum stock over all warehouses rather than reading only `warehouse_id`
    pub sum_all_warehouses: bool,
    pub timeout: Duration,
}

impl ErplyConfig {
    pub fn new<S: Into<String>>(client_code: S, username: S, password: Secret<String>) -> Self {
        let client_code = client_code.into();
        let api_url = default_api_url(&client_code);
        Self {
            client_code,
            username: username.into(),
            password,
            api_url,
            warehouse_id: None,
            sum_all_warehouses: true,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn new_from_env() -> Result<Self, MissingEnvVars> {
        let mut env = EnvReader::from_env();
        let config = Self::from_reader(&mut env);
        env.finish()?;
        Ok(config)
    }

    /// Reads the Erply settings. Missing credentials are recorded in `env` rather than failing straight away, so that
    /// the caller can report every missing variable at once.
    pub fn from_reader(env: &mut EnvReader) -> Self {
        let client_code = env.required("ERPLY_CLIENT_CODE");
        let username = env.required("ERPLY_USERNAME");
        let password = Secret::new(env.required("ERPLY_PASSWORD"));
        let api_url = env.optional("ERPLY_API_URL").unwrap_or_else(|| {
            let url = default_api_url(&client_code);
            debug!("🪛️ ERPLY_API_URL not set, using {url}");
            url
        });
        let warehouse_id = env.parsed::<i64>("ERPLY_WAREHOUSE_ID");
        let sum_all_warehouses = env.flag("SUM_ALL_WAREHOUSES", true);
        Self { client_code, username, password, api_url, warehouse_id, sum_all_warehouses, timeout: DEFAULT_TIMEOUT }
    }

    /// True if stock should be read from the pinned warehouse only
    pub fn reads_single_warehouse(&self) -> bool {
        self.warehouse_id.is_some() && !self.sum_all_warehouses
    }
}

pub fn default_api_url(client_code: &str) -> String {
    format!("https://{client_code}.erply.com/api/")
}
