use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use serde::Serialize;

/// Body used when the payload itself cannot be encoded
pub const SERIALIZATION_ERROR_BODY: &str = r#"{"error":"Serialization error"}"#;

const ALLOWED_METHODS: &str = "OPTIONS,GET,POST";

#[derive(Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
}

/// Encode `payload` as a JSON response. Never fails: an encoding error keeps the
/// status and degrades to `SERIALIZATION_ERROR_BODY`.
pub fn json_response<T: Serialize + ?Sized>(
    status: StatusCode,
    payload: &T,
    cors_origin: Option<&str>,
) -> Response {
    let body = serde_json::to_string(payload).unwrap_or_else(|e| {
        tracing::error!("Failed to serialize response body: {}", e);
        SERIALIZATION_ERROR_BODY.to_string()
    });

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    if let Some(origin) = cors_origin {
        let origin = HeaderValue::from_str(origin).unwrap_or_else(|_| {
            tracing::warn!("FRONTEND_BASE_URL is not a valid header value, using '*'");
            HeaderValue::from_static("*")
        });
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
    }
    response
}

pub fn error_response(status: StatusCode, message: &str, cors_origin: Option<&str>) -> Response {
    json_response(status, &ErrorBody { error: message }, cors_origin)
}
