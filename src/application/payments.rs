use crate::application::ledger::MAX_GRANT_DAYS;
use crate::domain::{format_timestamp, PaymentRecord, PaymentStatus};
use crate::infrastructure::JsonStore;
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Invalid invoice payload: {0}")]
    InvalidPayload(String),
    #[error("Unknown tariff plan: {0}")]
    UnknownTariff(String),
}

/// Append-only-by-key record of issued invoices and their status.
pub struct PaymentTracker {
    store: Arc<JsonStore>,
}

impl PaymentTracker {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }

    /// Issue a fresh payment id and store a pending record for it.
    pub fn create_invoice_record(&self, user_id: i64, duration_days: i64, amount: u64) -> String {
        let payment_id = Uuid::new_v4().to_string();
        let record = PaymentRecord {
            user_id,
            duration_days,
            amount,
            status: PaymentStatus::Pending,
            created_at: format_timestamp(Utc::now().naive_utc()),
            updated_at: None,
        };
        self.store.update(|doc| {
            doc.payments.insert(payment_id.clone(), record);
        });
        info!(
            payment_id = %payment_id,
            user_id,
            amount,
            days = duration_days,
            "Invoice record created"
        );
        payment_id
    }

    /// Update the status of a known payment; unknown ids are logged and
    /// ignored. Records are never deleted.
    pub fn mark_status(&self, payment_id: &str, status: PaymentStatus) {
        let updated = self.store.update_if(|doc| match doc.payments.get_mut(payment_id) {
            Some(record) => {
                record.status = status;
                record.updated_at = Some(format_timestamp(Utc::now().naive_utc()));
                (true, true)
            }
            None => (false, false),
        });
        if updated {
            info!(payment_id = %payment_id, status = %status, "Payment status updated");
        } else {
            warn!(payment_id = %payment_id, "Status update for unknown payment id ignored");
        }
    }

    pub fn get_payment(&self, payment_id: &str) -> Option<PaymentRecord> {
        self.store.read(|doc| doc.payments.get(payment_id).cloned())
    }
}

/// Application-chosen payload attached to an outgoing invoice and echoed
/// back by the payment provider on confirmation. Encodes everything the
/// transport needs to reconcile: mark the payment succeeded, then grant
/// the entitlement, in that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoicePayload {
    pub user_id: i64,
    pub duration_days: i64,
    pub payment_id: String,
}

impl InvoicePayload {
    pub fn encode(&self) -> String {
        format!("{}_{}_{}", self.user_id, self.duration_days, self.payment_id)
    }

    /// Parse a provider-echoed payload. The duration must be a positive
    /// day count no larger than [`MAX_GRANT_DAYS`]; anything else is
    /// treated as a forged or corrupted payload.
    pub fn parse(raw: &str) -> Result<Self, PaymentError> {
        let mut parts = raw.splitn(3, '_');
        let user_id = parts
            .next()
            .and_then(|p| p.parse::<i64>().ok())
            .ok_or_else(|| PaymentError::InvalidPayload(raw.to_string()))?;
        let duration_days = parts
            .next()
            .and_then(|p| p.parse::<i64>().ok())
            .filter(|d| (1..=MAX_GRANT_DAYS).contains(d))
            .ok_or_else(|| PaymentError::InvalidPayload(raw.to_string()))?;
        let payment_id = parts
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| PaymentError::InvalidPayload(raw.to_string()))?
            .to_string();
        Ok(Self {
            user_id,
            duration_days,
            payment_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn tracker() -> (PaymentTracker, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonStore::open(dir.path().join("store.json")));
        (PaymentTracker::new(store), dir)
    }

    #[test]
    fn invoice_record_starts_pending() {
        let (tracker, _dir) = tracker();
        let id = tracker.create_invoice_record(42, 30, 29_900);

        let record = tracker.get_payment(&id).unwrap();
        assert_eq!(record.status, PaymentStatus::Pending);
        assert_eq!(record.user_id, 42);
        assert_eq!(record.duration_days, 30);
        assert_eq!(record.amount, 29_900);
        assert!(record.updated_at.is_none());
    }

    #[test]
    fn payment_ids_do_not_collide() {
        let (tracker, _dir) = tracker();
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(seen.insert(tracker.create_invoice_record(1, 30, 100)));
        }
    }

    #[test]
    fn mark_status_updates_only_status_and_timestamp() {
        let (tracker, _dir) = tracker();
        let id = tracker.create_invoice_record(42, 30, 29_900);
        let before = tracker.get_payment(&id).unwrap();

        tracker.mark_status(&id, PaymentStatus::Succeeded);

        let after = tracker.get_payment(&id).unwrap();
        assert_eq!(after.status, PaymentStatus::Succeeded);
        assert!(after.updated_at.is_some());
        assert_eq!(after.user_id, before.user_id);
        assert_eq!(after.duration_days, before.duration_days);
        assert_eq!(after.amount, before.amount);
        assert_eq!(after.created_at, before.created_at);
    }

    #[test]
    fn mark_status_on_unknown_id_is_a_no_op() {
        let (tracker, _dir) = tracker();
        let id = tracker.create_invoice_record(42, 30, 29_900);

        tracker.mark_status("no-such-payment", PaymentStatus::Succeeded);

        let record = tracker.get_payment(&id).unwrap();
        assert_eq!(record.status, PaymentStatus::Pending);
        assert!(tracker.get_payment("no-such-payment").is_none());
    }

    #[test]
    fn payload_round_trips() {
        let payload = InvoicePayload {
            user_id: 42,
            duration_days: 30,
            payment_id: "d3b0a7e2-1111-2222-3333-444455556666".to_string(),
        };
        let encoded = payload.encode();
        assert_eq!(InvoicePayload::parse(&encoded).unwrap(), payload);
    }

    #[test]
    fn malformed_payloads_are_rejected() {
        assert!(InvoicePayload::parse("").is_err());
        assert!(InvoicePayload::parse("42_30").is_err());
        assert!(InvoicePayload::parse("abc_30_pid").is_err());
        assert!(InvoicePayload::parse("42_xx_pid").is_err());
        assert!(InvoicePayload::parse("42_30_").is_err());
    }

    #[test]
    fn out_of_range_durations_are_rejected() {
        assert!(InvoicePayload::parse("42_0_pid").is_err());
        assert!(InvoicePayload::parse("42_-5_pid").is_err());
        assert!(InvoicePayload::parse("1_9223372036854775807_pid").is_err());
        assert!(InvoicePayload::parse("42_36500_pid").is_ok());
    }
}
