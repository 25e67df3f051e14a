use axum::http::HeaderMap;

/// The admin surface is gated on a single configured operator id,
/// carried in the `x-operator-id` header. No richer authorization
/// model exists.
pub(super) fn is_operator(headers: &HeaderMap, operator_id: i64) -> bool {
    headers
        .get("x-operator-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<i64>().ok())
        .map(|id| id == operator_id)
        .unwrap_or(false)
}
