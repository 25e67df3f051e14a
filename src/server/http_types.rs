use crate::domain::{DrawnCard, Stats, ThreeCardSpread, UserAccount};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Serialize, ToSchema)]
pub(super) struct HealthResponse {
    pub(super) status: String,
}

#[derive(Deserialize, ToSchema)]
pub(super) struct RegisterUserRequest {
    #[schema(example = 42)]
    pub(super) user_id: i64,
    pub(super) handle: Option<String>,
    pub(super) display_name: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub(super) struct UserResponse {
    pub(super) user_id: i64,
    pub(super) handle: String,
    pub(super) display_name: String,
    pub(super) joined: String,
    pub(super) horoscope_count: u64,
    pub(super) numerology_count: u64,
    pub(super) tarot_count: u64,
    pub(super) compatibility_count: u64,
    pub(super) total_requests: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) birth_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) life_path_number: Option<u8>,
    pub(super) entitled: bool,
}

impl UserResponse {
    pub(super) fn from_account(user_id: i64, user: UserAccount, entitled: bool) -> Self {
        Self {
            user_id,
            handle: user.handle,
            display_name: user.display_name,
            joined: user.joined,
            horoscope_count: user.horoscope_count,
            numerology_count: user.numerology_count,
            tarot_count: user.tarot_count,
            compatibility_count: user.compatibility_count,
            total_requests: user.total_requests,
            birth_date: user.birth_date,
            life_path_number: user.life_path_number,
            entitled,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub(super) struct UsageRequest {
    #[schema(example = "tarot")]
    pub(super) topic: String,
}

#[derive(Deserialize, Debug, IntoParams, ToSchema)]
pub(super) struct ContentQuery {
    pub(super) user_id: Option<i64>,
}

#[derive(Serialize, ToSchema)]
pub(super) struct ContentResponse {
    pub(super) text: String,
}

#[derive(Deserialize, ToSchema)]
pub(super) struct NumerologyRequest {
    pub(super) user_id: i64,
    #[schema(example = "23.09.1992")]
    pub(super) birth_date: String,
}

#[derive(Serialize, ToSchema)]
pub(super) struct NumerologyResponse {
    pub(super) life_path_number: u8,
    pub(super) text: String,
}

#[derive(Deserialize, Debug, IntoParams, ToSchema)]
pub(super) struct TarotQuery {
    pub(super) user_id: i64,
}

#[derive(Serialize, ToSchema)]
pub(super) struct CardResponse {
    pub(super) name: String,
    pub(super) reversed: bool,
}

impl From<DrawnCard> for CardResponse {
    fn from(card: DrawnCard) -> Self {
        Self {
            name: card.name,
            reversed: card.reversed,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub(super) struct DailyCardResponse {
    pub(super) card: CardResponse,
    pub(super) text: String,
}

#[derive(Serialize, ToSchema)]
pub(super) struct SpreadResponse {
    pub(super) past: CardResponse,
    pub(super) present: CardResponse,
    pub(super) future: CardResponse,
    pub(super) text: String,
}

impl SpreadResponse {
    pub(super) fn new(spread: ThreeCardSpread, text: String) -> Self {
        Self {
            past: spread.past.into(),
            present: spread.present.into(),
            future: spread.future.into(),
            text,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub(super) struct InvoiceRequest {
    pub(super) user_id: i64,
    #[schema(example = "1m")]
    pub(super) plan: String,
}

#[derive(Serialize, ToSchema)]
pub(super) struct InvoiceResponse {
    pub(super) payment_id: String,
    pub(super) payload: String,
    pub(super) duration_days: i64,
    pub(super) amount: u64,
}

#[derive(Deserialize, ToSchema)]
pub(super) struct ConfirmRequest {
    pub(super) payload: String,
}

#[derive(Serialize, ToSchema)]
pub(super) struct ConfirmResponse {
    pub(super) user_id: i64,
    pub(super) premium_until: String,
}

#[derive(Deserialize, ToSchema)]
pub(super) struct GrantRequest {
    pub(super) user_id: i64,
    #[schema(example = 30, minimum = 1)]
    pub(super) days: i64,
}

#[derive(Serialize, ToSchema)]
pub(super) struct GrantResponse {
    pub(super) user_id: i64,
    pub(super) premium_until: String,
}

#[derive(Serialize, ToSchema)]
pub(super) struct RevokeResponse {
    pub(super) user_id: i64,
    pub(super) removed: bool,
}

#[derive(Serialize, ToSchema)]
pub(super) struct EntitledEntry {
    pub(super) user_id: i64,
    pub(super) expires_at: String,
}

#[derive(Serialize, ToSchema)]
pub(super) struct StatsResponse {
    pub(super) total_users: u64,
    pub(super) entitled_users: u64,
    pub(super) total_payments: u64,
    pub(super) succeeded_payments: u64,
    pub(super) total_horoscopes: u64,
    pub(super) total_numerology: u64,
    pub(super) total_tarot: u64,
    pub(super) total_compatibility: u64,
    pub(super) total_revenue: u64,
}

impl From<Stats> for StatsResponse {
    fn from(stats: Stats) -> Self {
        Self {
            total_users: stats.total_users,
            entitled_users: stats.entitled_users,
            total_payments: stats.total_payments,
            succeeded_payments: stats.succeeded_payments,
            total_horoscopes: stats.total_horoscopes,
            total_numerology: stats.total_numerology,
            total_tarot: stats.total_tarot,
            total_compatibility: stats.total_compatibility,
            total_revenue: stats.total_revenue,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub(super) struct MaintenanceRequest {
    pub(super) active: bool,
}

#[derive(Serialize, ToSchema)]
pub(super) struct MaintenanceResponse {
    pub(super) active: bool,
}

#[derive(Deserialize, ToSchema)]
pub(super) struct BroadcastRequest {
    pub(super) text: String,
}

#[derive(Serialize, ToSchema)]
pub(super) struct BroadcastResponse {
    pub(super) attempted: usize,
    pub(super) delivered: usize,
}
