// Read-only HTTP API over the deals store
use crate::model::StoredDeal;
use crate::storage::SqliteStorage;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Page size served by both endpoints.
const PAGE_LIMIT: u32 = 50;

#[derive(Clone)]
pub struct ApiState {
    pub storage: Arc<Mutex<SqliteStorage>>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/deals", get(list_deals))
        .route("/deals/category/:category", get(list_deals_by_category))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn list_deals(
    State(state): State<ApiState>,
) -> Result<Json<Vec<StoredDeal>>, (StatusCode, String)> {
    info!("GET /deals");
    let storage = state.storage.lock().await;
    storage
        .recent_deals(PAGE_LIMIT)
        .map(Json)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

async fn list_deals_by_category(
    State(state): State<ApiState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<StoredDeal>>, (StatusCode, String)> {
    info!("GET /deals/category/{}", category);
    let storage = state.storage.lock().await;
    storage
        .deals_by_category(&category, PAGE_LIMIT)
        .map(Json)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}
