use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use shared::{
    domain::Order,
    protocol::{add_order_route, health_route, AddOrderResponse},
};
use tracing::{error, info, warn};

mod api;
mod app_state;
mod config;
mod store;

use api::{create_order, get_order, ApiContext, CreateOrderError};
use app_state::AppState;
use config::load_settings;
use store::OrderStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let store = OrderStore::new();
    if let Some(seed_path) = &settings.seed_path {
        let added = store.load_seed(seed_path).await.map_err(|error| {
            error!(seed_path = %seed_path.display(), %error, "failed to load seed orders");
            error
        })?;
        info!(added, seed_path = %seed_path.display(), "seed orders loaded");
    }

    let state = AppState {
        api: ApiContext { store },
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "order server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(health_route(), get(health))
        .route("/order/", get(missing_order_id))
        .route("/order/:order_uid", get(http_get_order))
        .route(add_order_route(), post(http_add_order))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn missing_order_id() -> (StatusCode, &'static str) {
    (StatusCode::BAD_REQUEST, "Order ID required")
}

async fn http_get_order(
    State(state): State<Arc<AppState>>,
    Path(order_uid): Path<String>,
) -> Response {
    match get_order(&state.api, &order_uid).await {
        Some(order) => Json(order).into_response(),
        None => {
            info!(%order_uid, "order not found");
            (StatusCode::NOT_FOUND, "Order not found").into_response()
        }
    }
}

async fn http_add_order(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<AddOrderResponse>), (StatusCode, String)> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if !content_type.contains("application/json") {
        warn!(%content_type, "rejected add_order with wrong content type");
        return Err((
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Content-Type must be application/json".to_string(),
        ));
    }

    let order: Order = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "rejected add_order with invalid JSON");
        (StatusCode::BAD_REQUEST, format!("Invalid JSON: {e}"))
    })?;

    let order_uid = create_order(&state.api, order, Utc::now())
        .await
        .map_err(|e| {
            warn!(error = %e, "order creation failed");
            match e {
                CreateOrderError::Validation(_) => (StatusCode::BAD_REQUEST, e.to_string()),
                CreateOrderError::Conflict(_) => (StatusCode::CONFLICT, e.to_string()),
            }
        })?;

    info!(%order_uid, "order created");
    Ok((
        StatusCode::CREATED,
        Json(AddOrderResponse::created(order_uid)),
    ))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
