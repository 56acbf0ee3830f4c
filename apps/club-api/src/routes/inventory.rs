//! `/api/inventory/items`: the price list sold at the counter.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use cue_core::{
    InventoryItem, InventoryItemUpdate, NewInventoryItem, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::CurrentAdmin;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/inventory/items", get(list_items).post(create_item))
        .route(
            "/api/inventory/items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
}

/// Unlike session listing, inventory listing hides inactive items by default.
#[derive(Debug, Deserialize)]
pub struct InventoryListQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default = "default_true")]
    pub active_only: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub permanent: bool,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

fn default_true() -> bool {
    true
}

async fn list_items(
    State(state): State<Arc<AppState>>,
    _admin: CurrentAdmin,
    Query(query): Query<InventoryListQuery>,
) -> ApiResult<Json<Vec<InventoryItem>>> {
    let items = state
        .db
        .inventory()
        .list(
            query.skip.max(0),
            query.limit.clamp(1, MAX_PAGE_SIZE),
            query.active_only,
        )
        .await?;
    Ok(Json(items))
}

async fn get_item(
    State(state): State<Arc<AppState>>,
    _admin: CurrentAdmin,
    Path(id): Path<String>,
) -> ApiResult<Json<InventoryItem>> {
    state
        .db
        .inventory()
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Inventory item not found: {id}")))
}

async fn create_item(
    State(state): State<Arc<AppState>>,
    _admin: CurrentAdmin,
    Json(input): Json<NewInventoryItem>,
) -> ApiResult<(StatusCode, Json<InventoryItem>)> {
    let item = state.db.inventory().create(&input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_item(
    State(state): State<Arc<AppState>>,
    _admin: CurrentAdmin,
    Path(id): Path<String>,
    Json(changes): Json<InventoryItemUpdate>,
) -> ApiResult<Json<InventoryItem>> {
    let item = state.db.inventory().update(&id, &changes).await?;
    Ok(Json(item))
}

async fn delete_item(
    State(state): State<Arc<AppState>>,
    _admin: CurrentAdmin,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> ApiResult<Json<Value>> {
    let message = if query.permanent {
        state.db.inventory().delete(&id).await?;
        "Inventory item permanently deleted successfully"
    } else {
        state.db.inventory().deactivate(&id).await?;
        "Inventory item deactivated successfully"
    };
    Ok(Json(json!({ "message": message })))
}
