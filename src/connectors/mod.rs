use reqwest::header::HeaderMap;
use reqwest::Method;
use std::time::Duration;
use thiserror::Error;

pub mod http;

pub use http::ReqwestTransport;

/// A fully built outbound request. Sensitive header values are marked as such.
#[derive(Clone, Debug)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    /// Exact bytes to transmit; `None` sends no body
    pub body: Option<String>,
    /// Overrides the client-wide timeout for this request
    pub timeout: Option<Duration>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Outbound HTTP capability shared by the exchange and commerce clients
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, req: TransportRequest) -> Result<TransportResponse, ConnectorError>;
}

#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("request to {0} timed out")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid request: {0}")]
    Invalid(String),
}

impl From<reqwest::Error> for ConnectorError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            let url = e.url().map(|u| u.to_string()).unwrap_or_default();
            ConnectorError::Timeout(url)
        } else if e.is_builder() {
            ConnectorError::Invalid(e.to_string())
        } else {
            ConnectorError::Network(e.to_string())
        }
    }
}
