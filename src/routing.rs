use axum::routing::{any, get};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;

use crate::api;
use crate::commerce::CommerceClient;
use crate::config::{ProxyConfig, SecretBackend};
use crate::connectors::{ReqwestTransport, Transport};
use crate::exchange::ExchangeProxy;
use crate::metrics;
use crate::secret_store::{AwsSecretProvider, CredentialStore, EnvSecretProvider, SecretProvider};

#[derive(Clone)]
pub struct AppState {
    exchange: Arc<ExchangeProxy>,
    commerce: Arc<CommerceClient>,
    cors_origin: Arc<str>,
}

impl AppState {
    /// Wire the production collaborators from configuration
    pub async fn new(cfg: &ProxyConfig) -> anyhow::Result<Self> {
        let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new(
            Duration::from_millis(cfg.connect_timeout_ms),
            Duration::from_millis(cfg.request_timeout_ms),
        )?);

        let secrets: Arc<dyn SecretProvider> = match cfg.secret_backend {
            SecretBackend::Aws => Arc::new(AwsSecretProvider::from_env().await),
            SecretBackend::Env => Arc::new(EnvSecretProvider::new()),
        };
        if cfg.secret_id.is_none() {
            tracing::warn!("COINBASE_API_SECRET_ARN is not set; exchange calls will fail");
        }

        Ok(Self::from_parts(cfg, secrets, transport))
    }

    /// Assemble state around the given collaborators
    pub fn from_parts(
        cfg: &ProxyConfig,
        secrets: Arc<dyn SecretProvider>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let credentials = Arc::new(CredentialStore::new(secrets, cfg.secret_id.clone()));
        let exchange = ExchangeProxy::new(
            credentials,
            Arc::clone(&transport),
            cfg.exchange_base_url.clone(),
        );
        let commerce = CommerceClient::new(transport, cfg.commerce.clone(), cfg.redirect_base());

        Self {
            exchange: Arc::new(exchange),
            commerce: Arc::new(commerce),
            cors_origin: Arc::from(cfg.cors_origin()),
        }
    }

    pub fn exchange(&self) -> &ExchangeProxy {
        &self.exchange
    }

    pub fn commerce(&self) -> &CommerceClient {
        &self.commerce
    }

    pub fn cors_origin(&self) -> &str {
        &self.cors_origin
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/exchange", any(api::exchange::proxy))
        .route("/charges", any(api::commerce::create_charge))
        .route("/healthz", get(|| async { "ok" }))
        .route("/metrics", get(metrics::metrics_handler))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
