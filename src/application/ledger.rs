use crate::domain::{format_timestamp, parse_timestamp, Stats, Topic, UserAccount};
use crate::infrastructure::JsonStore;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::info;

/// Upper bound on grant durations, 100 years. Inputs beyond it clamp so
/// expiry arithmetic can never overflow the timestamp range.
pub const MAX_GRANT_DAYS: i64 = 36_500;

/// Single source of truth for registered users, usage counters, and
/// premium expiry.
///
/// Persistence failures never surface here: the store logs them and the
/// in-memory state stays authoritative until the process exits.
pub struct EntitlementLedger {
    store: Arc<JsonStore>,
}

impl EntitlementLedger {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }

    /// Idempotent insert; an existing id is left untouched.
    pub fn register_user(&self, id: i64, handle: Option<&str>, display_name: Option<&str>) {
        self.store.update_if(|doc| {
            let key = id.to_string();
            if doc.users.contains_key(&key) {
                return ((), false);
            }
            let user = UserAccount::new(
                handle.map(str::to_string),
                display_name.map(str::to_string),
            );
            info!(user_id = id, name = %user.display_name, "Registered new user");
            doc.users.insert(key, user);
            ((), true)
        });
    }

    /// Bump the topic counter and the running total, auto-registering
    /// the user with placeholder display fields if needed.
    pub fn record_usage(&self, id: i64, topic: Topic) {
        self.store.update(|doc| {
            let user = doc
                .users
                .entry(id.to_string())
                .or_insert_with(|| UserAccount::new(None, None));
            user.record_usage(topic);
        });
    }

    /// Set expiry to now + duration, overwriting any prior value.
    /// Grants do not stack; the returned string is the new expiry.
    ///
    /// Non-positive durations are accepted and produce an already-expired
    /// record; callers validate. Durations are clamped to
    /// [`MAX_GRANT_DAYS`] in either direction.
    pub fn grant_entitlement(&self, id: i64, duration_days: i64) -> String {
        let days = duration_days.clamp(-MAX_GRANT_DAYS, MAX_GRANT_DAYS);
        let expires_at = Utc::now().naive_utc() + Duration::days(days);
        let expiry = format_timestamp(expires_at);
        self.store.update(|doc| {
            doc.premium.insert(id.to_string(), expiry.clone());
        });
        info!(user_id = id, days, until = %expiry, "Entitlement granted");
        expiry
    }

    /// Read that may prune: an expired or unparseable record is removed
    /// on the spot and `false` returned.
    pub fn is_entitled(&self, id: i64) -> bool {
        self.store.update_if(|doc| {
            let key = id.to_string();
            let Some(raw) = doc.premium.get(&key) else {
                return (false, false);
            };
            match parse_timestamp(raw) {
                Some(expires_at) if expires_at > Utc::now().naive_utc() => (true, false),
                _ => {
                    doc.premium.remove(&key);
                    info!(user_id = id, "Entitlement expired, record pruned");
                    (false, true)
                }
            }
        })
    }

    /// Returns whether a record was actually removed.
    pub fn revoke_entitlement(&self, id: i64) -> bool {
        let removed = self.store.update_if(|doc| {
            let removed = doc.premium.remove(&id.to_string()).is_some();
            (removed, removed)
        });
        if removed {
            info!(user_id = id, "Entitlement revoked");
        }
        removed
    }

    /// No-op for unregistered users.
    pub fn set_numerology_profile(&self, id: i64, birth_date: &str, life_path: u8) {
        self.store.update_if(|doc| {
            match doc.users.get_mut(&id.to_string()) {
                Some(user) => {
                    user.birth_date = Some(birth_date.to_string());
                    user.life_path_number = Some(life_path);
                    ((), true)
                }
                None => ((), false),
            }
        });
    }

    pub fn get_user(&self, id: i64) -> Option<UserAccount> {
        self.store.read(|doc| doc.users.get(&id.to_string()).cloned())
    }

    /// All registered recipient ids, for broadcast fan-out.
    pub fn user_ids(&self) -> Vec<i64> {
        self.store.read(|doc| {
            doc.users
                .keys()
                .filter_map(|k| k.parse::<i64>().ok())
                .collect()
        })
    }

    /// Raw entitlement records (id, expiry string) for the operator
    /// console. Expired entries are not pruned here; pruning happens on
    /// the next `is_entitled` read.
    pub fn list_entitled(&self) -> Vec<(i64, String)> {
        self.store.read(|doc| {
            let mut entries: Vec<(i64, String)> = doc
                .premium
                .iter()
                .filter_map(|(k, v)| k.parse::<i64>().ok().map(|id| (id, v.clone())))
                .collect();
            entries.sort_unstable_by_key(|(id, _)| *id);
            entries
        })
    }

    /// Aggregate counters over the full store. Never fails: a poisoned
    /// lock is recovered and an inconsistent document simply sums to
    /// whatever is there, so the worst case is an all-zero value.
    pub fn aggregate_stats(&self) -> Stats {
        self.store.read(|doc| {
            let mut stats = Stats {
                total_users: doc.users.len() as u64,
                entitled_users: doc.premium.len() as u64,
                total_payments: doc.payments.len() as u64,
                ..Stats::default()
            };
            for payment in doc.payments.values() {
                if payment.status == crate::domain::PaymentStatus::Succeeded {
                    stats.succeeded_payments += 1;
                    stats.total_revenue += payment.amount;
                }
            }
            for user in doc.users.values() {
                stats.total_horoscopes += user.horoscope_count;
                stats.total_numerology += user.numerology_count;
                stats.total_tarot += user.tarot_count;
                stats.total_compatibility += user.compatibility_count;
            }
            stats
        })
    }
}
