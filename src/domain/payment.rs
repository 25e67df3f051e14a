use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Succeeded,
    Failed,
    Cancelled,
}

/// One issued invoice. Keyed in the store by a payment id the core
/// generates itself; records are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentRecord {
    pub user_id: i64,
    pub duration_days: i64,
    pub amount: u64,
    pub status: PaymentStatus,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Purchasable subscription plans. Amounts are in minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tariff {
    pub code: &'static str,
    pub duration_days: i64,
    pub amount: u64,
}

pub const TARIFFS: [Tariff; 3] = [
    Tariff {
        code: "1m",
        duration_days: 30,
        amount: 29_900,
    },
    Tariff {
        code: "3m",
        duration_days: 90,
        amount: 79_900,
    },
    Tariff {
        code: "12m",
        duration_days: 365,
        amount: 199_900,
    },
];

impl Tariff {
    pub fn by_code(code: &str) -> Option<Tariff> {
        TARIFFS.iter().find(|t| t.code == code).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn tariff_lookup_by_code() {
        let monthly = Tariff::by_code("1m").unwrap();
        assert_eq!(monthly.duration_days, 30);
        assert_eq!(monthly.amount, 29_900);

        assert!(Tariff::by_code("lifetime").is_none());
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(PaymentStatus::Succeeded.to_string(), "succeeded");
        assert_eq!(
            PaymentStatus::from_str("pending").unwrap(),
            PaymentStatus::Pending
        );
    }
}
