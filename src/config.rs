use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming an optional TOML config file
pub const CONFIG_PATH_ENV: &str = "COINBASE_PROXY_CONFIG";

/// Which backend the exchange credentials are fetched from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretBackend {
    /// AWS Secrets Manager
    #[default]
    Aws,
    /// Environment variable named by the secret id (local development)
    Env,
}

impl std::str::FromStr for SecretBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "aws" => Ok(Self::Aws),
            "env" => Ok(Self::Env),
            other => Err(ConfigError::Invalid(format!(
                "unknown secret backend '{}', expected 'aws' or 'env'",
                other
            ))),
        }
    }
}

/// Gateway configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ProxyConfig {
    /// Port the HTTP server binds to
    #[serde(default = "default_port")]
    pub port: u16,

    /// Exchange REST base URL (no trailing slash)
    #[serde(default = "default_exchange_base_url")]
    pub exchange_base_url: String,

    /// Identifier of the secret holding `apiKey`, `apiSecret`, `apiPassphrase`
    #[serde(default)]
    pub secret_id: Option<String>,

    #[serde(default)]
    pub secret_backend: SecretBackend,

    /// Frontend origin, used for CORS and Commerce redirects
    #[serde(default)]
    pub frontend_base_url: Option<String>,

    /// Outbound connect timeout in milliseconds
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Outbound end-to-end request timeout in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    #[serde(default)]
    pub commerce: CommerceConfig,
}

/// Coinbase Commerce settings
#[derive(Clone, Deserialize, Serialize)]
pub struct CommerceConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_charges_url")]
    pub charges_url: String,

    #[serde(default = "default_commerce_api_version")]
    pub api_version: String,

    /// Charge creation timeout in milliseconds
    #[serde(default = "default_commerce_timeout_ms")]
    pub timeout_ms: u64,
}

impl std::fmt::Debug for CommerceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommerceConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("charges_url", &self.charges_url)
            .field("api_version", &self.api_version)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

fn default_port() -> u16 {
    8080
}

fn default_exchange_base_url() -> String {
    "https://api-public.sandbox.exchange.coinbase.com".to_string()
}

fn default_connect_timeout_ms() -> u64 {
    10000 // 10 seconds
}

fn default_request_timeout_ms() -> u64 {
    25000 // 25 seconds
}

fn default_charges_url() -> String {
    "https://api.commerce.coinbase.com/charges".to_string()
}

fn default_commerce_api_version() -> String {
    "2018-03-22".to_string()
}

fn default_commerce_timeout_ms() -> u64 {
    20000
}

const DEFAULT_REDIRECT_BASE: &str = "http://localhost:3000";

impl Default for CommerceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            charges_url: default_charges_url(),
            api_version: default_commerce_api_version(),
            timeout_ms: default_commerce_timeout_ms(),
        }
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            exchange_base_url: default_exchange_base_url(),
            secret_id: None,
            secret_backend: SecretBackend::default(),
            frontend_base_url: None,
            connect_timeout_ms: default_connect_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            commerce: CommerceConfig::default(),
        }
    }
}

impl ProxyConfig {
    /// Load from the optional TOML file, then apply process environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut cfg = match non_blank(std::env::var(CONFIG_PATH_ENV).ok()) {
            Some(path) => Self::from_toml_file(&path)?,
            None => Self::default(),
        };
        cfg.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Apply overrides from `lookup`; blank values count as unset
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_blank(lookup(key));

        if let Some(port) = get("PORT") {
            self.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("PORT is not a valid port: {}", port)))?;
        }
        if let Some(id) = get("COINBASE_API_SECRET_ARN") {
            self.secret_id = Some(id);
        }
        if let Some(backend) = get("COINBASE_SECRET_BACKEND") {
            self.secret_backend = backend.parse()?;
        }
        if let Some(url) = get("COINBASE_EXCHANGE_BASE_URL") {
            self.exchange_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(url) = get("FRONTEND_BASE_URL") {
            self.frontend_base_url = Some(url);
        }
        if let Some(key) = get("COINBASE_COMMERCE_API_KEY_ENV") {
            self.commerce.api_key = Some(key);
        }
        if let Some(ms) = get("COINBASE_CONNECT_TIMEOUT_MS") {
            self.connect_timeout_ms = parse_ms("COINBASE_CONNECT_TIMEOUT_MS", &ms)?;
        }
        if let Some(ms) = get("COINBASE_REQUEST_TIMEOUT_MS") {
            self.request_timeout_ms = parse_ms("COINBASE_REQUEST_TIMEOUT_MS", &ms)?;
        }
        Ok(())
    }

    /// Value of `Access-Control-Allow-Origin` on exchange responses
    pub fn cors_origin(&self) -> &str {
        self.frontend_base_url.as_deref().unwrap_or("*")
    }

    /// Base URL Commerce sends the customer back to
    pub fn redirect_base(&self) -> &str {
        self.frontend_base_url
            .as_deref()
            .unwrap_or(DEFAULT_REDIRECT_BASE)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_ms(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{} is not a number of milliseconds: {}", key, value)))
}
