use super::{Result, SecretError, SecretProvider};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Exchange API credentials, immutable once loaded
pub struct Credentials {
    api_key: String,
    api_secret: SecretString,
    api_passphrase: SecretString,
}

impl Credentials {
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        api_passphrase: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: SecretString::from(api_secret.into()),
            api_passphrase: SecretString::from(api_passphrase.into()),
        }
    }

    /// Parse the secret payload: a JSON object with `apiKey`, `apiSecret`, `apiPassphrase`
    pub fn from_secret_payload(payload: &str) -> Result<Self> {
        #[derive(Deserialize)]
        #[serde(transparent)]
        struct Payload(HashMap<String, serde_json::Value>);

        let Payload(mut fields) =
            serde_json::from_str(payload).map_err(|e| SecretError::Malformed(e.to_string()))?;

        let mut take = |name: &'static str| -> Result<String> {
            match fields.remove(name) {
                Some(serde_json::Value::String(v)) if !v.is_empty() => Ok(v),
                Some(serde_json::Value::String(_)) | Some(serde_json::Value::Null) | None => {
                    Err(SecretError::MissingField(name))
                }
                Some(_) => Err(SecretError::Malformed(format!("field '{}' is not a string", name))),
            }
        };

        let api_key = take("apiKey")?;
        let api_secret = take("apiSecret")?;
        let api_passphrase = take("apiPassphrase")?;
        Ok(Self::new(api_key, api_secret, api_passphrase))
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Base64-encoded HMAC key
    pub fn api_secret(&self) -> &str {
        self.api_secret.expose_secret()
    }

    pub fn api_passphrase(&self) -> &str {
        self.api_passphrase.expose_secret()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .field("api_secret", &"[REDACTED]")
            .field("api_passphrase", &"[REDACTED]")
            .finish()
    }
}

/// Lazily loaded, process-wide credential cache.
///
/// The first caller fetches the secret; concurrent callers wait on that fetch.
/// A failed fetch leaves the cache empty so the next call tries again.
pub struct CredentialStore {
    provider: Arc<dyn SecretProvider>,
    secret_id: Option<String>,
    cached: OnceCell<Arc<Credentials>>,
}

impl CredentialStore {
    pub fn new(provider: Arc<dyn SecretProvider>, secret_id: Option<String>) -> Self {
        Self {
            provider,
            secret_id,
            cached: OnceCell::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.cached.initialized()
    }

    /// Return the cached credentials, fetching them on first use
    pub async fn ensure_loaded(&self) -> Result<Arc<Credentials>> {
        self.cached
            .get_or_try_init(|| self.load())
            .await
            .map(Arc::clone)
    }

    async fn load(&self) -> Result<Arc<Credentials>> {
        let secret_id = self.secret_id.as_deref().ok_or_else(|| {
            SecretError::Config("COINBASE_API_SECRET_ARN environment variable is not set.".into())
        })?;

        let result = self
            .provider
            .get_secret(secret_id)
            .await
            .and_then(|payload| Credentials::from_secret_payload(&payload));

        match result {
            Ok(credentials) => {
                crate::metrics::SECRET_LOADS.with_label_values(&["ok"]).inc();
                tracing::info!("Loaded exchange credentials from secret store");
                Ok(Arc::new(credentials))
            }
            Err(e) => {
                crate::metrics::SECRET_LOADS.with_label_values(&["error"]).inc();
                tracing::error!("Failed to load exchange credentials: {}", e);
                Err(e)
            }
        }
    }
}
