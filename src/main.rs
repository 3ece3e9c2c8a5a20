mod api;
mod config;
mod extractor;
mod ingestor;
mod model;
mod normalizer;
mod storage;

use api::ApiState;
use config::load_config;
use extractor::{DealExtractor, Extractor};
use ingestor::{MessageSource, TelegramIngestor};
use rand::Rng;
use std::sync::Arc;
use storage::SqliteStorage;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load configuration from file
    let config = match load_config("config.json") {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    // Initialize storage (SQLite) with async access (wrapped in a Mutex)
    let storage = match SqliteStorage::new(&config.db_path) {
        Ok(s) => Arc::new(Mutex::new(s)),
        Err(e) => {
            error!("Failed to initialize storage: {:?}", e);
            return;
        }
    };

    let extractor = DealExtractor::new(config.affiliate_tags());
    let ingestor = TelegramIngestor::new(config.telegram_bot_token.clone());

    // The read API runs alongside the ingest loop
    let api_state = ApiState {
        storage: storage.clone(),
    };
    let bind_addr = config.api_bind_addr.clone();
    tokio::spawn(async move {
        let listener = match TcpListener::bind(&bind_addr).await {
            Ok(l) => l,
            Err(e) => {
                error!("Failed to bind API listener on {}: {}", bind_addr, e);
                return;
            }
        };
        info!("Read API listening on {}", bind_addr);
        if let Err(e) = axum::serve(listener, api::router(api_state)).await {
            error!("API server error: {}", e);
        }
    });

    info!("🚀 dealhawk started, watching the feed...");

    // Main ingest loop
    loop {
        match ingestor.poll().await {
            Ok(messages) => {
                for message in messages {
                    process_message(&message.text, message.chat_id, &extractor, &storage).await;
                }
            }
            Err(e) => warn!("Feed poll error: {:?}", e),
        }

        let jitter = rand::rng().random_range(0..=config.poll_jitter_ms);
        sleep(Duration::from_secs(config.poll_interval_seconds) + Duration::from_millis(jitter))
            .await;
    }
}

/// Runs one message through extraction and persists the record when it
/// clears the link/price gate.
async fn process_message(
    text: &str,
    chat_id: i64,
    extractor: &DealExtractor,
    storage: &Arc<Mutex<SqliteStorage>>,
) {
    let record = extractor.extract(text);

    if !record.is_persistable() {
        info!("Skipping message from chat {}: no link or price", chat_id);
        return;
    }

    info!(
        "Deal found: {} | {:?} | {}",
        record.product_name,
        record.deal_price,
        record.platform.as_str()
    );

    if let Err(e) = storage.lock().await.insert_deal(&record) {
        warn!("DB save error: {:?}", e);
    }
}
