use crate::application::{
    BroadcastService, ContentSelector, EntitlementLedger, Maintenance, PaymentTracker,
};
use crate::infrastructure::{AppConfig, ChatApiClient, ContentCatalog, JsonStore};
use anyhow::Context;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<EntitlementLedger>,
    pub payments: Arc<PaymentTracker>,
    pub selector: Arc<ContentSelector>,
    pub broadcast: Arc<BroadcastService<ChatApiClient>>,
    pub maintenance: Maintenance,
    pub operator_id: i64,
}

/// Build full state from config.
///
/// Opens the document store, loads the static catalog, and wires the
/// services. Intended for both the standalone binary and embedding into
/// a larger Axum app.
pub fn build_state(config: AppConfig) -> anyhow::Result<AppState> {
    let store = Arc::new(JsonStore::open(&config.store_path));
    let catalog = ContentCatalog::load(&config.catalog_path);

    let chat_client = Arc::new(
        ChatApiClient::new(config.chat_api_url.clone(), &config.chat_api_token)
            .context("init chat API client")?,
    );

    let ledger = Arc::new(EntitlementLedger::new(store.clone()));
    let payments = Arc::new(PaymentTracker::new(store));
    let selector = Arc::new(ContentSelector::new(catalog));
    let broadcast = Arc::new(BroadcastService::new(ledger.clone(), chat_client));
    let maintenance = Maintenance::new(config.maintenance_on_start);

    Ok(AppState {
        ledger,
        payments,
        selector,
        broadcast,
        maintenance,
        operator_id: config.operator_id,
    })
}
