use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Timestamp format used throughout the persistent document.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Legacy date-only form still found in older documents.
pub const LEGACY_DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp, accepting the legacy date-only form.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .ok()
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(s, LEGACY_DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Content categories served by the bot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Horoscope,
    Numerology,
    Tarot,
    Compatibility,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserAccount {
    pub handle: String,
    pub display_name: String,
    pub joined: String,
    pub horoscope_count: u64,
    pub numerology_count: u64,
    pub tarot_count: u64,
    pub compatibility_count: u64,
    pub total_requests: u64,
    pub birth_date: Option<String>,
    pub life_path_number: Option<u8>,
}

impl UserAccount {
    pub fn new(handle: Option<String>, display_name: Option<String>) -> Self {
        Self {
            handle: handle.unwrap_or_else(|| "unknown".to_string()),
            display_name: display_name.unwrap_or_else(|| "Stargazer".to_string()),
            joined: format_timestamp(Utc::now().naive_utc()),
            horoscope_count: 0,
            numerology_count: 0,
            tarot_count: 0,
            compatibility_count: 0,
            total_requests: 0,
            birth_date: None,
            life_path_number: None,
        }
    }

    /// Bump the counter for one topic and the running total.
    pub fn record_usage(&mut self, topic: Topic) {
        match topic {
            Topic::Horoscope => self.horoscope_count += 1,
            Topic::Numerology => self.numerology_count += 1,
            Topic::Tarot => self.tarot_count += 1,
            Topic::Compatibility => self.compatibility_count += 1,
        }
        self.total_requests += 1;
    }

    pub fn topic_count(&self, topic: Topic) -> u64 {
        match topic {
            Topic::Horoscope => self.horoscope_count,
            Topic::Numerology => self.numerology_count,
            Topic::Tarot => self.tarot_count,
            Topic::Compatibility => self.compatibility_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn usage_keeps_total_consistent_with_topic_counters() {
        let mut user = UserAccount::new(None, None);
        user.record_usage(Topic::Horoscope);
        user.record_usage(Topic::Horoscope);
        user.record_usage(Topic::Tarot);

        assert_eq!(user.horoscope_count, 2);
        assert_eq!(user.tarot_count, 1);
        assert_eq!(
            user.total_requests,
            user.horoscope_count
                + user.numerology_count
                + user.tarot_count
                + user.compatibility_count
        );
    }

    #[test]
    fn missing_display_fields_default_to_placeholders() {
        let user = UserAccount::new(None, None);
        assert_eq!(user.handle, "unknown");
        assert_eq!(user.display_name, "Stargazer");
    }

    #[test]
    fn timestamp_round_trips_and_accepts_legacy_dates() {
        let now = Utc::now().naive_utc();
        let formatted = format_timestamp(now);
        let parsed = parse_timestamp(&formatted).unwrap();
        assert_eq!(formatted, format_timestamp(parsed));

        let legacy = parse_timestamp("2025-03-14").unwrap();
        assert_eq!(format_timestamp(legacy), "2025-03-14 00:00:00");

        assert!(parse_timestamp("not a date").is_none());
    }

    #[test]
    fn topic_parses_from_snake_case() {
        assert_eq!(Topic::from_str("horoscope").unwrap(), Topic::Horoscope);
        assert_eq!(Topic::Numerology.to_string(), "numerology");
        assert!(Topic::from_str("astrology").is_err());
    }
}
