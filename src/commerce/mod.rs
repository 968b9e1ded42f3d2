//! Coinbase Commerce hosted checkout links.

mod client;
mod types;

use axum::http::StatusCode;

use crate::connectors::ConnectorError;

pub use client::CommerceClient;
pub use types::{CreatePaymentInput, PaymentLink};

#[derive(Debug, thiserror::Error)]
pub enum CommerceError {
    #[error("Invalid amount")]
    InvalidAmount,

    #[error("Missing COINBASE_COMMERCE_API_KEY_ENV env var")]
    MissingApiKey,

    #[error("Coinbase API error: {0}")]
    Api(String),

    #[error("Unexpected Coinbase response")]
    UnexpectedResponse,

    #[error("Coinbase API error: {0}")]
    Connector(#[from] ConnectorError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CommerceError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidAmount => StatusCode::BAD_REQUEST,
            Self::Api(_) | Self::UnexpectedResponse | Self::Connector(_) => {
                StatusCode::BAD_GATEWAY
            }
            Self::MissingApiKey | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
