//! `/api/admin`: staff account management.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use cue_core::{Admin, AdminUpdate, ListQuery};
use serde_json::{json, Value};

use crate::auth::CurrentAdmin;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin", get(list_admins))
        .route(
            "/api/admin/{id}",
            get(get_admin).put(update_admin).delete(delete_admin),
        )
}

async fn list_admins(
    State(state): State<Arc<AppState>>,
    _admin: CurrentAdmin,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Admin>>> {
    let query = query.clamped();
    let admins = state.db.admins().list_active(query.skip, query.limit).await?;
    Ok(Json(admins))
}

async fn get_admin(
    State(state): State<Arc<AppState>>,
    _admin: CurrentAdmin,
    Path(id): Path<String>,
) -> ApiResult<Json<Admin>> {
    state
        .db
        .admins()
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Admin not found: {id}")))
}

async fn update_admin(
    State(state): State<Arc<AppState>>,
    _admin: CurrentAdmin,
    Path(id): Path<String>,
    Json(changes): Json<AdminUpdate>,
) -> ApiResult<Json<Admin>> {
    let admin = state.db.admins().update(&id, &changes).await?;
    Ok(Json(admin))
}

async fn delete_admin(
    State(state): State<Arc<AppState>>,
    CurrentAdmin(current): CurrentAdmin,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    if current.id == id {
        return Err(ApiError::InvalidRequest(
            "Cannot delete your own account".to_string(),
        ));
    }
    state.db.admins().deactivate(&id).await?;
    Ok(Json(json!({ "message": "Admin deleted successfully" })))
}
