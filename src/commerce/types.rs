use serde::{Deserialize, Serialize};

/// Inbound charge request
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentInput {
    /// USD amount
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    /// Overrides the configured frontend URL
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub cancel_url: Option<String>,
}

/// Hosted checkout link returned to the caller
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLink {
    pub id: String,
    pub charge_id: String,
    pub hosted_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub amount: f64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    /// pending | completed | expired | failed
    pub status: String,
}

/// `POST /charges` request body
#[derive(Debug, Serialize)]
pub(crate) struct CreateChargeBody<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub pricing_type: &'static str,
    pub local_price: LocalPrice,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ChargeMetadata<'a>>,
    pub redirect_url: &'a str,
    pub cancel_url: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct LocalPrice {
    pub amount: String,
    pub currency: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChargeMetadata<'a> {
    pub customer_email: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChargeResponse {
    pub data: Option<ChargeData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChargeData {
    pub code: Option<String>,
    pub hosted_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}
