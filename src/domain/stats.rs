use serde::{Deserialize, Serialize};

/// Aggregate counters computed on demand from the full store.
///
/// An all-zero value doubles as the safe fallback when aggregation
/// cannot run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stats {
    pub total_users: u64,
    pub entitled_users: u64,
    pub total_payments: u64,
    pub succeeded_payments: u64,
    pub total_horoscopes: u64,
    pub total_numerology: u64,
    pub total_tarot: u64,
    pub total_compatibility: u64,
    pub total_revenue: u64,
}
