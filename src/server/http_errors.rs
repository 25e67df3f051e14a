use crate::application::{ContentError, PaymentError};
use axum::http::StatusCode;
use axum::Json;

pub(super) fn map_content_error(err: &ContentError) -> (StatusCode, Json<serde_json::Value>) {
    match err {
        ContentError::InvalidDate(_) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": err.to_string() })),
        ),
    }
}

pub(super) fn map_payment_error(err: &PaymentError) -> (StatusCode, Json<serde_json::Value>) {
    match err {
        PaymentError::InvalidPayload(_) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Malformed invoice payload" })),
        ),
        PaymentError::UnknownTariff(plan) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": format!("Unknown tariff plan: {}", plan) })),
        ),
    }
}

pub(super) fn forbidden() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::FORBIDDEN,
        Json(serde_json::json!({ "error": "Access denied" })),
    )
}

pub(super) fn premium_required() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::FORBIDDEN,
        Json(serde_json::json!({ "error": "Premium subscription required" })),
    )
}
