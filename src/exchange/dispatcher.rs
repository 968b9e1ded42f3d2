use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use std::sync::Arc;
use std::time::Instant;

use super::{signer, ProxyAction, ProxyError, ProxyOutcome};
use crate::connectors::{Transport, TransportRequest};
use crate::metrics;
use crate::secret_store::{CredentialStore, Credentials};

const CB_ACCESS_KEY: HeaderName = HeaderName::from_static("cb-access-key");
const CB_ACCESS_SIGN: HeaderName = HeaderName::from_static("cb-access-sign");
const CB_ACCESS_TIMESTAMP: HeaderName = HeaderName::from_static("cb-access-timestamp");
const CB_ACCESS_PASSPHRASE: HeaderName = HeaderName::from_static("cb-access-passphrase");

/// Relays decoded actions to the exchange with signed requests.
pub struct ExchangeProxy {
    credentials: Arc<CredentialStore>,
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl ExchangeProxy {
    pub fn new(
        credentials: Arc<CredentialStore>,
        transport: Arc<dyn Transport>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            transport,
            base_url: base_url.into(),
        }
    }

    /// Handle one raw inbound payload. Never fails: every error becomes an outcome.
    pub async fn dispatch(&self, raw: &[u8]) -> ProxyOutcome {
        let started = Instant::now();
        let (action_name, result) = match ProxyAction::decode(raw) {
            Ok(action) => (action.name(), self.execute(&action).await),
            Err(e) => ("unknown", Err(e)),
        };

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                // Remote failures are logged where the response is read
                match &e {
                    ProxyError::Remote { .. } => {}
                    e if e.status().is_server_error() => {
                        tracing::error!(action = action_name, "Unhandled error in exchange proxy: {}", e);
                    }
                    e => {
                        tracing::info!(action = action_name, "Rejected exchange request: {}", e);
                    }
                }
                ProxyOutcome::from(e)
            }
        };

        metrics::REQUESTS_TOTAL
            .with_label_values(&["exchange", action_name, outcome.status.as_str()])
            .inc();
        metrics::REQUEST_DURATION
            .with_label_values(&["exchange", action_name])
            .observe(started.elapsed().as_secs_f64());
        outcome
    }

    async fn execute(&self, action: &ProxyAction) -> Result<ProxyOutcome, ProxyError> {
        // Validation precedes any secret, signing or network work
        let request = action.build_request()?;
        let credentials = self.credentials.ensure_loaded().await?;

        let timestamp = time::OffsetDateTime::now_utc().unix_timestamp().to_string();
        let signature = signer::sign(
            credentials.api_secret(),
            &timestamp,
            request.method.as_str(),
            &request.path,
            &request.body,
        )?;

        tracing::info!(
            action = action.name(),
            method = %request.method,
            path = %request.path,
            "Forwarding signed request to exchange"
        );

        let response = self
            .transport
            .send(TransportRequest {
                url: format!("{}{}", self.base_url, request.path),
                headers: auth_headers(&credentials, &signature, &timestamp)?,
                body: (!request.body.is_empty()).then_some(request.body),
                method: request.method,
                timeout: None,
            })
            .await?;

        metrics::UPSTREAM_RESPONSES
            .with_label_values(&[action.name(), &response.status.to_string()])
            .inc();

        if response.status == 200 {
            return Ok(ProxyOutcome::ok(action.parse_success(&response.body)?));
        }

        tracing::error!(
            "Failed to {}: {} - {}",
            action.failure_context(),
            response.status,
            response.body
        );
        Err(ProxyError::Remote {
            context: action.failure_context(),
            status: response.status,
            body: response.body,
        })
    }
}

fn auth_headers(
    credentials: &Credentials,
    signature: &str,
    timestamp: &str,
) -> Result<HeaderMap, ProxyError> {
    let mut headers = HeaderMap::new();
    headers.insert(CB_ACCESS_KEY, sensitive("CB-ACCESS-KEY", credentials.api_key())?);
    headers.insert(CB_ACCESS_SIGN, sensitive("CB-ACCESS-SIGN", signature)?);
    headers.insert(CB_ACCESS_TIMESTAMP, sensitive("CB-ACCESS-TIMESTAMP", timestamp)?);
    headers.insert(
        CB_ACCESS_PASSPHRASE,
        sensitive("CB-ACCESS-PASSPHRASE", credentials.api_passphrase())?,
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

fn sensitive(name: &str, value: &str) -> Result<HeaderValue, ProxyError> {
    let mut header = HeaderValue::from_str(value)
        .map_err(|_| ProxyError::Internal(format!("{} is not a valid header value", name)))?;
    header.set_sensitive(true);
    Ok(header)
}
