use crate::error::RelayError;
use crate::lifecycle::logging::LogFormat;
use serde::{Deserialize, Serialize};

/// Environment variable holding the CORS allow-origin value.
pub const ALLOWED_ORIGINS_ENV: &str = "ALLOWED_ORIGINS";

// ─── Config ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,

    // Logging
    pub logging_to_file: bool,
    pub log_dir: Option<String>,
    pub log_format: LogFormat,

    // Request body size limit (MB)
    pub body_limit_mb: usize,

    // Model policy
    pub provider_name: String,
    pub model_prefix: String,
    pub default_model: String,
    pub default_temperature: f64,

    // CORS allow-origin; `None` means "*"
    pub allowed_origins: Option<String>,

    pub upstream: UpstreamConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8318,
            logging_to_file: false,
            log_dir: None,
            log_format: LogFormat::Text,
            body_limit_mb: 1,
            provider_name: "polza.ai".to_string(),
            model_prefix: "openai/".to_string(),
            default_model: "openai/gpt-4o-mini".to_string(),
            default_temperature: 0.7,
            allowed_origins: None,
            upstream: UpstreamConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a YAML file, sanitize, and validate.
    pub fn load(path: &str) -> Result<Self, anyhow::Error> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml_ng::from_str(&contents)?;
        config.sanitize();
        config.validate()?;
        Ok(config)
    }

    /// Overlay values taken from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    /// Overlay values from an arbitrary variable lookup. Blank values are ignored.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_blank(&self.upstream.api_key_env) {
            self.upstream.api_key = Some(key);
        }
        if let Some(origins) = non_blank(ALLOWED_ORIGINS_ENV) {
            self.allowed_origins = Some(origins);
        }
    }

    /// The upstream bearer secret. Fails when it is absent or blank.
    pub fn resolve_secret(&self) -> Result<&str, RelayError> {
        self.upstream.resolve_secret()
    }

    /// The `Access-Control-Allow-Origin` value, `*` when unset.
    pub fn resolve_cors_origin(&self) -> &str {
        self.allowed_origins
            .as_deref()
            .filter(|o| !o.is_empty())
            .unwrap_or("*")
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        let base = url::Url::parse(&self.upstream.base_url).map_err(|e| {
            anyhow::anyhow!("invalid upstream base-url '{}': {e}", self.upstream.base_url)
        })?;
        anyhow::ensure!(
            matches!(base.scheme(), "http" | "https"),
            "upstream base-url must use http or https, got '{}'",
            base.scheme()
        );
        anyhow::ensure!(
            self.upstream.request_timeout > 0,
            "upstream request-timeout must be greater than zero"
        );
        anyhow::ensure!(
            self.body_limit_mb > 0 && self.body_limit_mb.checked_mul(1024 * 1024).is_some(),
            "body-limit-mb must be a positive number of megabytes, got {}",
            self.body_limit_mb
        );
        anyhow::ensure!(
            self.default_model.starts_with(&self.model_prefix),
            "default-model '{}' does not start with model-prefix '{}'",
            self.default_model,
            self.model_prefix
        );
        if let Some(ref proxy) = self.upstream.proxy_url {
            crate::proxy::validate_proxy_url(proxy)?;
        }
        Ok(())
    }

    fn sanitize(&mut self) {
        while self.upstream.base_url.ends_with('/') {
            self.upstream.base_url.pop();
        }
        if self.upstream.api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
            self.upstream.api_key = None;
        }
        if self.upstream.proxy_url.as_deref() == Some("") {
            self.upstream.proxy_url = None;
        }
        if self.allowed_origins.as_deref().is_some_and(|o| o.trim().is_empty()) {
            self.allowed_origins = None;
        }
    }
}

// ─── Upstream ──────────────────────────────────────────────────────────────

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct UpstreamConfig {
    pub base_url: String,
    /// Name of the environment variable carrying the bearer secret.
    pub api_key_env: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub proxy_url: Option<String>,

    // Timeouts (seconds)
    pub connect_timeout: u64,
    pub request_timeout: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.polza.ai/api/v1".to_string(),
            api_key_env: "POLZA_AI_API_KEY".to_string(),
            api_key: None,
            proxy_url: None,
            connect_timeout: 30,
            request_timeout: 60,
        }
    }
}

impl UpstreamConfig {
    pub fn resolve_secret(&self) -> Result<&str, RelayError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(RelayError::Config(format!(
                "{} not configured",
                self.api_key_env
            ))),
        }
    }
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("api_key_env", &self.api_key_env)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("proxy_url", &self.proxy_url)
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
