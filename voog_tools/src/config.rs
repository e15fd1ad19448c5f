use std::time::Duration;

use evs_common::{EnvReader, MissingEnvVars, Secret};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Clone, Default)]
pub struct VoogConfig {
    pub site: String,
    pub api_token: Secret<String>,
    /// Replaces the ecommerce API base URL derived from `site`
    pub api_url: Option<String>,
    pub timeout: Duration,
}

impl VoogConfig {
    pub fn new<S: Into<String>>(site: S, api_token: Secret<String>) -> Self {
        Self { site: site.into(), api_token, api_url: None, timeout: DEFAULT_TIMEOUT }
    }

    pub fn new_from_env() -> Result<Self, MissingEnvVars> {
        let mut env = EnvReader::from_env();
        let config = Self::from_reader(&mut env);
        env.finish()?;
        Ok(config)
    }

    pub fn from_reader(env: &mut EnvReader) -> Self {
        let site = env.required("VOOG_SITE");
        let api_token = Secret::new(env.required("VOOG_API_TOKEN"));
        let api_url = env.optional("VOOG_API_URL");
        Self { site, api_token, api_url, timeout: DEFAULT_TIMEOUT }
    }

    /// The ecommerce API root, without a trailing slash
    pub fn base_url(&self) -> String {
        match &self.api_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.voog.com/admin/api/ecommerce/v1", self.site),
        }
    }
}
