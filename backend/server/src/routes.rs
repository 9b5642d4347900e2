use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::{
    error::AppError,
    format::now_local,
    pipeline::run_dashboard_aggregation,
    state::{AppState, Cards},
};

/// Single entry for now: the dashboard has no date filter yet.
pub const DELIVERIES_CACHE_KEY: &str = "deliveries:x_display";

#[derive(Serialize)]
pub struct DeliveriesResponse {
    pub cached: bool,
    pub cards: Cards,
}

pub async fn health_handler() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

pub async fn deliveries_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DeliveriesResponse>, AppError> {
    if let Some(cards) = state.cache.get(DELIVERIES_CACHE_KEY) {
        return Ok(Json(DeliveriesResponse {
            cached: true,
            cards,
        }));
    }

    let _guard = state.coalescer.acquire(DELIVERIES_CACHE_KEY).await;

    // another request may have rebuilt the entry while we waited
    if let Some(cards) = state.cache.get(DELIVERIES_CACHE_KEY) {
        debug!("Served {DELIVERIES_CACHE_KEY} from a concurrent rebuild");

        return Ok(Json(DeliveriesResponse {
            cached: true,
            cards,
        }));
    }

    let cards: Cards =
        Arc::new(run_dashboard_aggregation(state.client.as_ref(), now_local()).await?);
    state.cache.set(DELIVERIES_CACHE_KEY, cards.clone());

    Ok(Json(DeliveriesResponse {
        cached: false,
        cards,
    }))
}
