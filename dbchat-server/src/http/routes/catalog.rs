//! Schema and row-count endpoints backing the UI sidebar

use std::sync::Arc;

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::db::{OrderRepo, ProductRepo, UserRepo};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::schema::{TableInfo, TABLES};

/// Row counts per table
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub users: i64,
    pub products: i64,
    pub orders: i64,
    pub order_items: i64,
}

/// GET /api/schema
async fn schema() -> Json<&'static [TableInfo]> {
    Json(TABLES)
}

/// GET /api/stats
async fn stats(State(state): State<Arc<AppState>>) -> Result<Json<StatsResponse>, ApiError> {
    let pool = state.db.pool();
    let orders = OrderRepo::new(pool);
    Ok(Json(StatsResponse {
        users: UserRepo::new(pool).count().await?,
        products: ProductRepo::new(pool).count().await?,
        orders: orders.count().await?,
        order_items: orders.count_items().await?,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/schema", get(schema))
        .route("/api/stats", get(stats))
}
