use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::Response,
};

use crate::api::response::{error_response, json_response};
use crate::metrics;
use crate::routing::AppState;

/// `/exchange`: relays a typed action to Coinbase Exchange
pub async fn proxy(State(app): State<AppState>, method: Method, body: Bytes) -> Response {
    let cors = Some(app.cors_origin());
    if method != Method::POST {
        let response = error_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed", cors);
        // dispatch records its own outcomes; rejected methods never reach it
        metrics::REQUESTS_TOTAL
            .with_label_values(&["exchange", "unknown", response.status().as_str()])
            .inc();
        return response;
    }

    let outcome = app.exchange().dispatch(&body).await;
    json_response(outcome.status, &outcome.body, cors)
}
