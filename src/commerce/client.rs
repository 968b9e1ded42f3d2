use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use std::sync::Arc;
use std::time::Duration;

use super::types::{ChargeMetadata, ChargeResponse, CreateChargeBody, LocalPrice};
use super::{CommerceError, CreatePaymentInput, PaymentLink};
use crate::config::CommerceConfig;
use crate::connectors::{Transport, TransportRequest};

const X_CC_API_KEY: HeaderName = HeaderName::from_static("x-cc-api-key");
const X_CC_VERSION: HeaderName = HeaderName::from_static("x-cc-version");

/// Creates hosted checkout charges. Authenticates with a static API key header.
pub struct CommerceClient {
    transport: Arc<dyn Transport>,
    config: CommerceConfig,
    redirect_base: String,
}

impl CommerceClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        config: CommerceConfig,
        redirect_base: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            config,
            redirect_base: redirect_base.into(),
        }
    }

    pub async fn create_charge(&self, input: CreatePaymentInput) -> Result<PaymentLink, CommerceError> {
        let amount = match input.amount {
            Some(a) if a.is_finite() && a > 0.0 => a,
            _ => return Err(CommerceError::InvalidAmount),
        };
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(CommerceError::MissingApiKey)?;

        let body = CreateChargeBody {
            name: input.description.as_deref().unwrap_or("Payment"),
            description: input.description.as_deref(),
            pricing_type: "fixed_price",
            local_price: LocalPrice {
                amount: format!("{:.2}", amount),
                currency: "USD",
            },
            metadata: input
                .customer_email
                .as_deref()
                .filter(|e| !e.trim().is_empty())
                .map(|customer_email| ChargeMetadata { customer_email }),
            redirect_url: input.redirect_url.as_deref().unwrap_or(&self.redirect_base),
            cancel_url: input.cancel_url.as_deref().unwrap_or(&self.redirect_base),
        };
        let payload =
            serde_json::to_string(&body).map_err(|e| CommerceError::Internal(e.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut key_header = HeaderValue::from_str(api_key)
            .map_err(|_| CommerceError::Internal("Commerce API key is not a valid header value".into()))?;
        key_header.set_sensitive(true);
        headers.insert(X_CC_API_KEY, key_header);
        headers.insert(
            X_CC_VERSION,
            HeaderValue::from_str(&self.config.api_version)
                .map_err(|_| CommerceError::Internal("invalid Commerce API version".into()))?,
        );

        tracing::info!("Creating Coinbase charge: amount={:.2} currency=USD", amount);
        let response = self
            .transport
            .send(TransportRequest {
                method: Method::POST,
                url: self.config.charges_url.clone(),
                headers,
                body: Some(payload),
                timeout: Some(Duration::from_millis(self.config.timeout_ms)),
            })
            .await?;

        crate::metrics::UPSTREAM_RESPONSES
            .with_label_values(&["createCharge", &response.status.to_string()])
            .inc();

        if !(200..300).contains(&response.status) {
            tracing::error!(
                "Coinbase API error status={} body={}",
                response.status,
                response.body
            );
            return Err(CommerceError::Api(extract_error_message(&response.body)));
        }

        let charge: ChargeResponse =
            serde_json::from_str(&response.body).map_err(|_| CommerceError::UnexpectedResponse)?;
        let data = charge.data.ok_or(CommerceError::UnexpectedResponse)?;
        let (code, hosted_url) = match (data.code, data.hosted_url) {
            (Some(code), Some(hosted_url)) => (code, hosted_url),
            _ => return Err(CommerceError::UnexpectedResponse),
        };

        Ok(PaymentLink {
            id: code.clone(),
            charge_id: code,
            hosted_url,
            created_at: data.created_at,
            amount,
            currency: "USD".to_string(),
            description: input.description,
            customer_email: input.customer_email,
            status: "pending".to_string(),
        })
    }
}

/// `error.message` from a Commerce error body, or the raw body
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message").map(|m| match m {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
        })
        .unwrap_or_else(|| body.to_string())
}
