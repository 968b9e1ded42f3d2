//! Secret Store Integration Module
//!
//! Exchange credentials live in a single named secret whose payload is a JSON
//! object with `apiKey`, `apiSecret` and `apiPassphrase`. Providers:
//!
//! - `AwsSecretProvider`: AWS Secrets Manager
//! - `EnvSecretProvider`: reads the payload from the environment variable named
//!   by the secret id
//!
//! `CredentialStore` fetches and parses the secret once per process.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use coinbase_proxy::secret_store::{AwsSecretProvider, CredentialStore};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = Arc::new(AwsSecretProvider::from_env().await);
//!     let store = CredentialStore::new(provider, Some("prod/coinbase/exchange".into()));
//!
//!     let credentials = store.ensure_loaded().await?;
//!     println!("loaded key {}", credentials.api_key().len());
//!     Ok(())
//! }
//! ```

mod credentials;
mod error;
mod provider;

pub use credentials::{CredentialStore, Credentials};
pub use error::{Result, SecretError};
pub use provider::{AwsSecretProvider, EnvSecretProvider, SecretProvider};
