//! API Handlers
//!
//! HTTP request handlers for the order endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::cache::{keys, Cache, CacheService, DistributedStore};
use crate::error::ApiError;
use crate::models::{GetOrderQuery, HealthResponse, Order};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Typed cache over the configured store
    pub cache: CacheService,
    /// Cancelled on shutdown; each request works under a child token
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Creates a new AppState over the given store.
    pub fn new(store: Arc<dyn DistributedStore>) -> Self {
        Self::with_shutdown(store, CancellationToken::new())
    }

    /// Creates a new AppState whose in-flight cache calls abort when `shutdown` fires.
    pub fn with_shutdown(store: Arc<dyn DistributedStore>, shutdown: CancellationToken) -> Self {
        Self {
            cache: CacheService::new(store),
            shutdown,
        }
    }
}

/// Handler for POST /Create
///
/// Caches the order under its id with the default expiration and echoes its
/// order number. A body that is not a valid order is a bad request.
pub async fn create_order_handler(
    State(state): State<AppState>,
    payload: Result<Json<Order>, JsonRejection>,
) -> Result<Json<String>, ApiError> {
    let Json(order) =
        payload.map_err(|rejection| ApiError::InvalidRequest(rejection.body_text()))?;

    if let Some(error_msg) = order.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let cancel = state.shutdown.child_token();
    state
        .cache
        .set(&keys::order(order.id), Some(&order), None, &cancel)
        .await?;

    info!("Cached order {} ({})", order.id, order.order_number);
    Ok(Json(order.order_number))
}

/// Handler for GET /GetOrder?orderId=
///
/// A miss, whatever its cause, is reported as "Order not found".
pub async fn get_order_handler(
    State(state): State<AppState>,
    Query(query): Query<GetOrderQuery>,
) -> Result<Json<Order>, ApiError> {
    let cancel = state.shutdown.child_token();
    let order: Option<Order> = state.cache.get(&keys::order(query.order_id), &cancel).await?;

    order.map(Json).ok_or(ApiError::OrderNotFound)
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
