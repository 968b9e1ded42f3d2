use super::{Result, SecretError};
use async_trait::async_trait;
use aws_sdk_secretsmanager::error::DisplayErrorContext;

/// Trait for secret providers - supports multiple implementations
#[async_trait]
pub trait SecretProvider: Send + Sync {
    /// Get the raw payload of a secret by identifier
    async fn get_secret(&self, secret_id: &str) -> Result<String>;
}

/// AWS Secrets Manager provider
pub struct AwsSecretProvider {
    client: aws_sdk_secretsmanager::Client,
}

impl AwsSecretProvider {
    pub fn new(client: aws_sdk_secretsmanager::Client) -> Self {
        Self { client }
    }

    /// Build a client from the default AWS credential chain (env, profile, IAM role)
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(aws_sdk_secretsmanager::Client::new(&config))
    }
}

#[async_trait]
impl SecretProvider for AwsSecretProvider {
    async fn get_secret(&self, secret_id: &str) -> Result<String> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|e| {
                let detail = DisplayErrorContext(&e).to_string();
                tracing::warn!("Failed to get secret '{}' from Secrets Manager: {}", secret_id, detail);
                SecretError::Backend(detail)
            })?;

        output
            .secret_string()
            .map(str::to_string)
            .ok_or(SecretError::Empty)
    }
}

/// Environment variable-based secret provider: the secret id names the variable
pub struct EnvSecretProvider;

impl EnvSecretProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EnvSecretProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecretProvider for EnvSecretProvider {
    async fn get_secret(&self, secret_id: &str) -> Result<String> {
        std::env::var(secret_id).map_err(|_| {
            tracing::debug!("Secret '{}' not found in environment variables", secret_id);
            SecretError::NotFound(secret_id.to_string())
        })
    }
}
