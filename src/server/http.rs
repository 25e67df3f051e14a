use super::http_auth::is_operator;
use super::http_errors::{forbidden, map_content_error, map_payment_error, premium_required};
use super::http_types::{
    BroadcastRequest, BroadcastResponse, CardResponse, ConfirmRequest, ConfirmResponse,
    ContentQuery, ContentResponse, DailyCardResponse, EntitledEntry, GrantRequest, GrantResponse,
    HealthResponse, InvoiceRequest, InvoiceResponse, MaintenanceRequest, MaintenanceResponse,
    NumerologyRequest, NumerologyResponse, RegisterUserRequest, RevokeResponse, SpreadResponse,
    StatsResponse, TarotQuery, UsageRequest, UserResponse,
};
use super::state::AppState;
use crate::application::{
    life_path_number, parse_birth_date, InvoicePayload, PaymentError, MAINTENANCE_NOTICE,
};
use crate::domain::{PaymentStatus, Tariff, Topic, ZodiacSign};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use std::str::FromStr;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/users", post(register_user))
        .route("/users/:id", get(get_user))
        .route("/users/:id/usage", post(record_usage))
        .route("/content/:topic", get(get_content))
        .route("/numerology", post(numerology_reading))
        .route("/tarot/daily", get(tarot_daily))
        .route("/tarot/three-card", get(tarot_three_card))
        .route("/payments/invoice", post(create_invoice))
        .route("/payments/confirm", post(confirm_payment))
        .route(
            "/admin/entitlements",
            post(grant_entitlement).get(list_entitlements),
        )
        .route("/admin/entitlements/:user_id", delete(revoke_entitlement))
        .route("/admin/stats", get(admin_stats))
        .route("/admin/maintenance", post(set_maintenance))
        .route("/admin/broadcast", post(broadcast))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        register_user,
        get_user,
        record_usage,
        get_content,
        numerology_reading,
        tarot_daily,
        tarot_three_card,
        create_invoice,
        confirm_payment,
        grant_entitlement,
        list_entitlements,
        revoke_entitlement,
        admin_stats,
        set_maintenance,
        broadcast,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterUserRequest,
            UserResponse,
            UsageRequest,
            ContentResponse,
            NumerologyRequest,
            NumerologyResponse,
            CardResponse,
            DailyCardResponse,
            SpreadResponse,
            InvoiceRequest,
            InvoiceResponse,
            ConfirmRequest,
            ConfirmResponse,
            GrantRequest,
            GrantResponse,
            RevokeResponse,
            EntitledEntry,
            StatsResponse,
            MaintenanceRequest,
            MaintenanceResponse,
            BroadcastRequest,
            BroadcastResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Users", description = "User registration and usage tracking"),
        (name = "Content", description = "Horoscope, numerology, and tarot content"),
        (name = "Payments", description = "Invoice and confirmation lifecycle"),
        (name = "Admin", description = "Operator console effects"),
    ),
    info(
        title = "Arcana API",
        version = "0.1.0",
        description = "Entitlement ledger and content delivery for the astrology bot",
        license(name = "MIT")
    )
)]
struct ApiDoc;

fn maintenance_notice() -> (StatusCode, Json<ContentResponse>) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ContentResponse {
            text: MAINTENANCE_NOTICE.to_string(),
        }),
    )
}

#[utoipa::path(get, path = "/health", tag = "Health",
    responses((status = 200, body = HealthResponse)))]
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[utoipa::path(post, path = "/users", tag = "Users",
    request_body = RegisterUserRequest,
    responses((status = 200, body = UserResponse)))]
async fn register_user(
    State(state): State<AppState>,
    Json(req): Json<RegisterUserRequest>,
) -> impl IntoResponse {
    state
        .ledger
        .register_user(req.user_id, req.handle.as_deref(), req.display_name.as_deref());
    match state.ledger.get_user(req.user_id) {
        Some(user) => {
            let entitled = state.ledger.is_entitled(req.user_id);
            Json(UserResponse::from_account(req.user_id, user, entitled)).into_response()
        }
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": "Registration failed" })),
        )
            .into_response(),
    }
}

#[utoipa::path(get, path = "/users/{id}", tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, body = UserResponse),
        (status = 404, description = "Unknown user"),
    ))]
async fn get_user(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    match state.ledger.get_user(id) {
        Some(user) => {
            let entitled = state.ledger.is_entitled(id);
            Json(UserResponse::from_account(id, user, entitled)).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "User not found" })),
        )
            .into_response(),
    }
}

#[utoipa::path(post, path = "/users/{id}/usage", tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    request_body = UsageRequest,
    responses((status = 200, description = "Counter bumped, or no-op for an unknown topic")))]
async fn record_usage(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UsageRequest>,
) -> impl IntoResponse {
    // Unknown categories are a logged no-op, never a failure.
    match Topic::from_str(&req.topic) {
        Ok(topic) => {
            state.ledger.record_usage(id, topic);
            Json(serde_json::json!({ "recorded": true }))
        }
        Err(_) => {
            warn!(user_id = id, topic = %req.topic, "Usage for unknown topic ignored");
            Json(serde_json::json!({ "recorded": false }))
        }
    }
}

#[utoipa::path(get, path = "/content/{topic}", tag = "Content",
    params(
        ("topic" = String, Path, description = "Zodiac sign, e.g. `Aries`"),
        ContentQuery,
    ),
    responses(
        (status = 200, body = ContentResponse),
        (status = 400, description = "Unknown zodiac sign"),
        (status = 503, description = "Maintenance active"),
    ))]
async fn get_content(
    State(state): State<AppState>,
    Path(topic): Path<String>,
    Query(query): Query<ContentQuery>,
) -> impl IntoResponse {
    if state.maintenance.is_active() {
        return maintenance_notice().into_response();
    }

    let Ok(sign) = ZodiacSign::from_str(&topic) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": format!("Unknown zodiac sign: {}", topic) })),
        )
            .into_response();
    };

    let entitled = match query.user_id {
        Some(user_id) => {
            state.ledger.record_usage(user_id, Topic::Horoscope);
            state.ledger.is_entitled(user_id)
        }
        None => false,
    };

    let text = state
        .selector
        .select_rendering(&sign.to_string(), query.user_id, entitled);
    Json(ContentResponse { text }).into_response()
}

#[utoipa::path(post, path = "/numerology", tag = "Content",
    request_body = NumerologyRequest,
    responses(
        (status = 200, body = NumerologyResponse),
        (status = 400, description = "Malformed birth date"),
        (status = 503, description = "Maintenance active"),
    ))]
async fn numerology_reading(
    State(state): State<AppState>,
    Json(req): Json<NumerologyRequest>,
) -> impl IntoResponse {
    if state.maintenance.is_active() {
        return maintenance_notice().into_response();
    }

    let birth_date = match parse_birth_date(&req.birth_date) {
        Ok(date) => date,
        Err(e) => return map_content_error(&e).into_response(),
    };

    state.ledger.record_usage(req.user_id, Topic::Numerology);
    let life_path = life_path_number(birth_date);
    state
        .ledger
        .set_numerology_profile(req.user_id, &req.birth_date, life_path);

    Json(NumerologyResponse {
        life_path_number: life_path,
        text: state.selector.render_numerology(birth_date, life_path),
    })
    .into_response()
}

#[utoipa::path(get, path = "/tarot/daily", tag = "Content",
    params(TarotQuery),
    responses(
        (status = 200, body = DailyCardResponse),
        (status = 403, description = "Premium required"),
        (status = 503, description = "Maintenance active"),
    ))]
async fn tarot_daily(
    State(state): State<AppState>,
    Query(query): Query<TarotQuery>,
) -> impl IntoResponse {
    if state.maintenance.is_active() {
        return maintenance_notice().into_response();
    }
    if !state.ledger.is_entitled(query.user_id) {
        return premium_required().into_response();
    }

    state.ledger.record_usage(query.user_id, Topic::Tarot);
    let card = state.selector.draw_one_card();
    let text = state.selector.render_daily_card(&card);
    Json(DailyCardResponse {
        card: card.into(),
        text,
    })
    .into_response()
}

#[utoipa::path(get, path = "/tarot/three-card", tag = "Content",
    params(TarotQuery),
    responses(
        (status = 200, body = SpreadResponse),
        (status = 403, description = "Premium required"),
        (status = 503, description = "Maintenance active"),
    ))]
async fn tarot_three_card(
    State(state): State<AppState>,
    Query(query): Query<TarotQuery>,
) -> impl IntoResponse {
    if state.maintenance.is_active() {
        return maintenance_notice().into_response();
    }
    if !state.ledger.is_entitled(query.user_id) {
        return premium_required().into_response();
    }

    state.ledger.record_usage(query.user_id, Topic::Tarot);
    let spread = state.selector.draw_three_cards();
    let text = state.selector.render_three_card_spread(&spread);
    Json(SpreadResponse::new(spread, text)).into_response()
}

#[utoipa::path(post, path = "/payments/invoice", tag = "Payments",
    request_body = InvoiceRequest,
    responses(
        (status = 200, body = InvoiceResponse),
        (status = 400, description = "Unknown tariff plan"),
    ))]
async fn create_invoice(
    State(state): State<AppState>,
    Json(req): Json<InvoiceRequest>,
) -> impl IntoResponse {
    let Some(tariff) = Tariff::by_code(&req.plan) else {
        return map_payment_error(&PaymentError::UnknownTariff(req.plan)).into_response();
    };

    let payment_id =
        state
            .payments
            .create_invoice_record(req.user_id, tariff.duration_days, tariff.amount);
    let payload = InvoicePayload {
        user_id: req.user_id,
        duration_days: tariff.duration_days,
        payment_id: payment_id.clone(),
    }
    .encode();

    Json(InvoiceResponse {
        payment_id,
        payload,
        duration_days: tariff.duration_days,
        amount: tariff.amount,
    })
    .into_response()
}

#[utoipa::path(post, path = "/payments/confirm", tag = "Payments",
    request_body = ConfirmRequest,
    responses(
        (status = 200, body = ConfirmResponse),
        (status = 400, description = "Malformed payload"),
    ))]
async fn confirm_payment(
    State(state): State<AppState>,
    Json(req): Json<ConfirmRequest>,
) -> impl IntoResponse {
    let payload = match InvoicePayload::parse(&req.payload) {
        Ok(p) => p,
        Err(e) => return map_payment_error(&e).into_response(),
    };

    // Reconciliation order matters: record the terminal status first,
    // then grant. A duplicate confirmation re-grants; accepted.
    state
        .payments
        .mark_status(&payload.payment_id, PaymentStatus::Succeeded);
    let premium_until = state
        .ledger
        .grant_entitlement(payload.user_id, payload.duration_days);

    info!(
        user_id = payload.user_id,
        payment_id = %payload.payment_id,
        "Payment confirmed, entitlement granted"
    );
    Json(ConfirmResponse {
        user_id: payload.user_id,
        premium_until,
    })
    .into_response()
}

#[utoipa::path(post, path = "/admin/entitlements", tag = "Admin",
    request_body = GrantRequest,
    responses(
        (status = 200, body = GrantResponse),
        (status = 400, description = "Non-positive duration"),
        (status = 403, description = "Not the operator"),
    ))]
async fn grant_entitlement(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<GrantRequest>,
) -> impl IntoResponse {
    if !is_operator(&headers, state.operator_id) {
        return forbidden().into_response();
    }
    // The ledger itself is permissive; duration is validated here.
    if req.days < 1 {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "days must be a positive integer" })),
        )
            .into_response();
    }

    let premium_until = state.ledger.grant_entitlement(req.user_id, req.days);
    Json(GrantResponse {
        user_id: req.user_id,
        premium_until,
    })
    .into_response()
}

#[utoipa::path(get, path = "/admin/entitlements", tag = "Admin",
    responses(
        (status = 200, body = [EntitledEntry]),
        (status = 403, description = "Not the operator"),
    ))]
async fn list_entitlements(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if !is_operator(&headers, state.operator_id) {
        return forbidden().into_response();
    }
    let entries: Vec<EntitledEntry> = state
        .ledger
        .list_entitled()
        .into_iter()
        .map(|(user_id, expires_at)| EntitledEntry {
            user_id,
            expires_at,
        })
        .collect();
    Json(entries).into_response()
}

#[utoipa::path(delete, path = "/admin/entitlements/{user_id}", tag = "Admin",
    params(("user_id" = i64, Path, description = "User id")),
    responses(
        (status = 200, body = RevokeResponse),
        (status = 403, description = "Not the operator"),
    ))]
async fn revoke_entitlement(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<i64>,
) -> impl IntoResponse {
    if !is_operator(&headers, state.operator_id) {
        return forbidden().into_response();
    }
    let removed = state.ledger.revoke_entitlement(user_id);
    Json(RevokeResponse { user_id, removed }).into_response()
}

#[utoipa::path(get, path = "/admin/stats", tag = "Admin",
    responses(
        (status = 200, body = StatsResponse),
        (status = 403, description = "Not the operator"),
    ))]
async fn admin_stats(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if !is_operator(&headers, state.operator_id) {
        return forbidden().into_response();
    }
    Json(StatsResponse::from(state.ledger.aggregate_stats())).into_response()
}

#[utoipa::path(post, path = "/admin/maintenance", tag = "Admin",
    request_body = MaintenanceRequest,
    responses(
        (status = 200, body = MaintenanceResponse),
        (status = 403, description = "Not the operator"),
    ))]
async fn set_maintenance(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<MaintenanceRequest>,
) -> impl IntoResponse {
    if !is_operator(&headers, state.operator_id) {
        return forbidden().into_response();
    }
    state.maintenance.set(req.active);
    Json(MaintenanceResponse { active: req.active }).into_response()
}

#[utoipa::path(post, path = "/admin/broadcast", tag = "Admin",
    request_body = BroadcastRequest,
    responses(
        (status = 200, body = BroadcastResponse),
        (status = 400, description = "Empty broadcast text"),
        (status = 403, description = "Not the operator"),
    ))]
async fn broadcast(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<BroadcastRequest>,
) -> impl IntoResponse {
    if !is_operator(&headers, state.operator_id) {
        return forbidden().into_response();
    }
    if req.text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Empty broadcast text" })),
        )
            .into_response();
    }

    let report = state.broadcast.broadcast(req.text.trim()).await;
    Json(BroadcastResponse {
        attempted: report.attempted,
        delivered: report.delivered,
    })
    .into_response()
}
