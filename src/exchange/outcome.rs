use axum::http::StatusCode;
use serde::Serialize;

use super::signer::SigningError;
use crate::connectors::ConnectorError;
use crate::secret_store::SecretError;

/// Everything that can stop a proxied call. Converted to a `ProxyOutcome` in
/// exactly one place, `ExchangeProxy::dispatch`.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("Unsupported proxy request type")]
    UnsupportedAction,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("{0}")]
    Validation(String),

    /// Non-200 from the exchange; relayed with the exchange's status
    #[error("Failed to {context}: {status} - {body}")]
    Remote {
        context: &'static str,
        status: u16,
        body: String,
    },

    #[error(transparent)]
    Secret(#[from] SecretError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error(transparent)]
    Connector(#[from] ConnectorError),

    #[error("{0}")]
    Internal(String),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::UnsupportedAction | Self::InvalidBody(_) | Self::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Remote { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Secret(_) | Self::Signing(_) | Self::Connector(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to the caller
    pub fn message(&self) -> String {
        match self {
            Self::Secret(_) | Self::Signing(_) | Self::Connector(_) | Self::Internal(_) => {
                format!("Internal server error: {}", self)
            }
            _ => self.to_string(),
        }
    }
}

/// JSON body of an outcome
#[derive(Clone, Debug, PartialEq)]
pub enum OutcomeBody {
    /// Downstream JSON relayed verbatim
    Passthrough(serde_json::Value),
    Error { message: String },
}

#[derive(Serialize)]
struct ErrorPayload<'a> {
    error: &'a str,
}

impl Serialize for OutcomeBody {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Passthrough(value) => value.serialize(serializer),
            Self::Error { message } => ErrorPayload { error: message }.serialize(serializer),
        }
    }
}

/// The only value handed back to the caller
#[derive(Clone, Debug, PartialEq)]
pub struct ProxyOutcome {
    pub status: StatusCode,
    pub body: OutcomeBody,
}

impl ProxyOutcome {
    pub fn ok(value: serde_json::Value) -> Self {
        Self {
            status: StatusCode::OK,
            body: OutcomeBody::Passthrough(value),
        }
    }

    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: OutcomeBody::Error {
                message: message.into(),
            },
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.body {
            OutcomeBody::Error { message } => Some(message),
            OutcomeBody::Passthrough(_) => None,
        }
    }
}

impl From<ProxyError> for ProxyOutcome {
    fn from(e: ProxyError) -> Self {
        Self::error(e.status(), e.message())
    }
}
