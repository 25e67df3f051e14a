use crate::application::EntitlementLedger;
use crate::infrastructure::MessageSink;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Fixed response all content-producing calls short-circuit to while
/// maintenance is active.
pub const MAINTENANCE_NOTICE: &str =
    "🔧 Maintenance in progress\n\nThe service is temporarily unavailable. Please try again later.";

/// Process-wide maintenance toggle, passed into the transport layer
/// explicitly rather than living in a global.
#[derive(Clone, Debug, Default)]
pub struct Maintenance {
    active: Arc<AtomicBool>,
}

impl Maintenance {
    pub fn new(active: bool) -> Self {
        Self {
            active: Arc::new(AtomicBool::new(active)),
        }
    }

    pub fn set(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
        info!(active, "Maintenance flag changed");
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

/// Outcome of a fan-out: how many recipients were attempted and how many
/// deliveries went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastReport {
    pub attempted: usize,
    pub delivered: usize,
}

/// Fan-out with partial-failure tolerance: every registered user gets an
/// attempt, failed recipients are logged and skipped, nothing is rolled
/// back, and failures do not disqualify a recipient from future rounds.
pub struct BroadcastService<S: MessageSink> {
    ledger: Arc<EntitlementLedger>,
    sink: Arc<S>,
}

impl<S: MessageSink> BroadcastService<S> {
    pub fn new(ledger: Arc<EntitlementLedger>, sink: Arc<S>) -> Self {
        Self { ledger, sink }
    }

    pub async fn broadcast(&self, text: &str) -> BroadcastReport {
        let recipients = self.ledger.user_ids();
        let message = format!("📢 ANNOUNCEMENT\n\n{}", text);
        let mut delivered = 0;

        for recipient in &recipients {
            match self.sink.send_text(*recipient, &message).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    warn!(recipient, "Broadcast delivery failed: {}", e);
                }
            }
        }

        info!(
            delivered,
            attempted = recipients.len(),
            "Broadcast finished"
        );
        BroadcastReport {
            attempted: recipients.len(),
            delivered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{DeliveryError, JsonStore};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Sink that refuses configured recipients and records the rest.
    #[derive(Default)]
    struct RecordingSink {
        refuse: Vec<i64>,
        sent: Mutex<Vec<(i64, String)>>,
    }

    #[async_trait]
    impl MessageSink for RecordingSink {
        async fn send_text(&self, recipient: i64, text: &str) -> Result<(), DeliveryError> {
            if self.refuse.contains(&recipient) {
                return Err(DeliveryError::Rejected(recipient));
            }
            self.sent
                .lock()
                .unwrap()
                .push((recipient, text.to_string()));
            Ok(())
        }
    }

    fn ledger_with_users(ids: &[i64]) -> (Arc<EntitlementLedger>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonStore::open(dir.path().join("store.json")));
        let ledger = Arc::new(EntitlementLedger::new(store));
        for id in ids {
            ledger.register_user(*id, None, None);
        }
        (ledger, dir)
    }

    #[test]
    fn maintenance_flag_round_trips() {
        let maintenance = Maintenance::new(false);
        assert!(!maintenance.is_active());
        maintenance.set(true);
        assert!(maintenance.is_active());

        // Clones observe the same flag.
        let clone = maintenance.clone();
        clone.set(false);
        assert!(!maintenance.is_active());
    }

    #[tokio::test]
    async fn broadcast_tolerates_per_recipient_failure() {
        let (ledger, _dir) = ledger_with_users(&[1, 2, 3]);
        let sink = Arc::new(RecordingSink {
            refuse: vec![2],
            ..Default::default()
        });
        let service = BroadcastService::new(ledger, sink.clone());

        let report = service.broadcast("Scheduled downtime tonight").await;
        assert_eq!(report.attempted, 3);
        assert_eq!(report.delivered, 2);

        let sent = sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert!(sent.iter().all(|(_, text)| text.contains("ANNOUNCEMENT")));
        assert!(sent
            .iter()
            .all(|(_, text)| text.contains("Scheduled downtime tonight")));
    }

    #[tokio::test]
    async fn broadcast_with_no_users_delivers_nothing() {
        let (ledger, _dir) = ledger_with_users(&[]);
        let sink = Arc::new(RecordingSink::default());
        let service = BroadcastService::new(ledger, sink);

        let report = service.broadcast("hello").await;
        assert_eq!(
            report,
            BroadcastReport {
                attempted: 0,
                delivered: 0
            }
        );
    }
}
