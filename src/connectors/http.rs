use reqwest::Client;
use std::time::Duration;

use crate::connectors::{ConnectorError, Transport, TransportRequest, TransportResponse};

/// `Transport` backed by a shared `reqwest::Client`
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(connect_timeout: Duration, request_timeout: Duration) -> Result<Self, ConnectorError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|e| ConnectorError::Invalid(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, req: TransportRequest) -> Result<TransportResponse, ConnectorError> {
        let mut rb = self
            .client
            .request(req.method, &req.url)
            .headers(req.headers);
        if let Some(body) = req.body {
            rb = rb.body(body);
        }
        if let Some(timeout) = req.timeout {
            rb = rb.timeout(timeout);
        }

        let resp = rb.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;

        Ok(TransportResponse { status, body })
    }
}
