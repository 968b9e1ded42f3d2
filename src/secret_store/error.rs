/// Errors related to secret store operations
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    /// Secret not found
    #[error("Secret not found: {0}")]
    NotFound(String),

    /// Backend returned the secret without a string payload
    #[error("Secret string is null.")]
    Empty,

    /// AWS Secrets Manager error
    #[error("Secrets Manager error: {0}")]
    Backend(String),

    /// Configuration error
    #[error("{0}")]
    Config(String),

    /// Payload is not a JSON object of strings
    #[error("Malformed secret payload: {0}")]
    Malformed(String),

    /// Payload is missing a required credential field
    #[error("Secret is missing required field '{0}'")]
    MissingField(&'static str),
}

pub type Result<T> = std::result::Result<T, SecretError>;
