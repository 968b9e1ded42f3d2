use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::Response,
};
use std::time::Instant;

use crate::api::response::{error_response, json_response};
use crate::commerce::CreatePaymentInput;
use crate::metrics;
use crate::routing::AppState;

/// `/charges`: creates a hosted Commerce checkout link
pub async fn create_charge(State(app): State<AppState>, method: Method, body: Bytes) -> Response {
    let started = Instant::now();
    let response = handle(&app, method, &body).await;

    metrics::REQUESTS_TOTAL
        .with_label_values(&["charges", "createCharge", response.status().as_str()])
        .inc();
    metrics::REQUEST_DURATION
        .with_label_values(&["charges", "createCharge"])
        .observe(started.elapsed().as_secs_f64());
    response
}

async fn handle(app: &AppState, method: Method, body: &[u8]) -> Response {
    if method != Method::POST {
        return error_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed", None);
    }
    if body.iter().all(u8::is_ascii_whitespace) {
        return error_response(StatusCode::BAD_REQUEST, "Invalid request body", None);
    }
    let input: CreatePaymentInput = match serde_json::from_slice(body) {
        Ok(input) => input,
        Err(e) => {
            tracing::info!("Rejected charge request: {}", e);
            return error_response(StatusCode::BAD_REQUEST, "Invalid request body", None);
        }
    };

    tracing::info!(
        amount = ?input.amount,
        description = ?input.description,
        "Create charge"
    );

    match app.commerce().create_charge(input).await {
        Ok(link) => json_response(StatusCode::OK, &link, None),
        Err(e) => {
            if e.status().is_server_error() {
                tracing::error!("Charge creation failed: {}", e);
            }
            error_response(e.status(), &e.to_string(), None)
        }
    }
}
