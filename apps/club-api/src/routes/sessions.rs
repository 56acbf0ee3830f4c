//! `/api/sessions`: the table-session lifecycle, plus `/api/rates`.
//!
//! ```text
//! POST /api/sessions                      open a table
//! POST /api/sessions/{id}/items           add a line item
//! DELETE /api/sessions/{id}/items/{line}  remove a line item
//! POST /api/sessions/{id}/end             close and bill
//! ```

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::Utc;
use cue_core::{
    CloseSession, HistoricalSession, ListQuery, NewSession, NewSessionItem, RateTable,
    SessionBill, SessionDetail, SessionItem, SessionUpdate,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::auth::CurrentAdmin;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/rates", get(get_rates))
        .route("/api/sessions", get(list_sessions).post(open_session))
        .route("/api/sessions/active", get(list_active_sessions))
        .route("/api/sessions/historical", post(create_historical_session))
        .route("/api/sessions/table/{table_number}", get(active_for_table))
        .route(
            "/api/sessions/{id}",
            get(get_session).put(update_session),
        )
        .route("/api/sessions/{id}/bill", get(get_bill))
        .route("/api/sessions/{id}/items", post(add_item))
        .route("/api/sessions/{id}/items/{item_id}", delete(remove_item))
        .route("/api/sessions/{id}/end", post(end_session))
}

/// Closed session together with its final bill.
#[derive(Debug, Serialize)]
pub struct ClosedSessionResponse {
    pub session: SessionDetail,
    pub bill: SessionBill,
}

async fn get_rates(State(state): State<Arc<AppState>>, _admin: CurrentAdmin) -> Json<RateTable> {
    Json(state.rates().clone())
}

async fn list_active_sessions(
    State(state): State<Arc<AppState>>,
    _admin: CurrentAdmin,
) -> ApiResult<Json<Vec<SessionDetail>>> {
    Ok(Json(state.sessions.list_active().await?))
}

async fn list_sessions(
    State(state): State<Arc<AppState>>,
    _admin: CurrentAdmin,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<SessionDetail>>> {
    Ok(Json(state.sessions.list(query.clamped()).await?))
}

async fn active_for_table(
    State(state): State<Arc<AppState>>,
    _admin: CurrentAdmin,
    Path(table_number): Path<i64>,
) -> ApiResult<Json<SessionDetail>> {
    state
        .sessions
        .active_for_table(table_number)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No active session on table {table_number}")))
}

async fn get_session(
    State(state): State<Arc<AppState>>,
    _admin: CurrentAdmin,
    Path(id): Path<String>,
) -> ApiResult<Json<SessionDetail>> {
    Ok(Json(state.sessions.get(&id).await?))
}

async fn open_session(
    State(state): State<Arc<AppState>>,
    CurrentAdmin(admin): CurrentAdmin,
    Json(input): Json<NewSession>,
) -> ApiResult<(StatusCode, Json<SessionDetail>)> {
    let detail = state.sessions.open(&input).await?;
    tracing::debug!(
        id = %detail.session.id,
        opened_by = %admin.username,
        "Session opened via API"
    );
    Ok((StatusCode::CREATED, Json(detail)))
}

async fn create_historical_session(
    State(state): State<Arc<AppState>>,
    _admin: CurrentAdmin,
    Json(input): Json<HistoricalSession>,
) -> ApiResult<(StatusCode, Json<SessionDetail>)> {
    let detail = state.sessions.create_historical(&input).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

async fn update_session(
    State(state): State<Arc<AppState>>,
    _admin: CurrentAdmin,
    Path(id): Path<String>,
    Json(changes): Json<SessionUpdate>,
) -> ApiResult<Json<SessionDetail>> {
    Ok(Json(state.sessions.update(&id, &changes).await?))
}

async fn get_bill(
    State(state): State<Arc<AppState>>,
    _admin: CurrentAdmin,
    Path(id): Path<String>,
) -> ApiResult<Json<SessionBill>> {
    Ok(Json(state.sessions.bill(&id).await?))
}

async fn add_item(
    State(state): State<Arc<AppState>>,
    _admin: CurrentAdmin,
    Path(id): Path<String>,
    Json(input): Json<NewSessionItem>,
) -> ApiResult<(StatusCode, Json<SessionItem>)> {
    let line = state
        .sessions
        .add_line_item(&id, &input.inventory_item_id, input.quantity)
        .await?;
    Ok((StatusCode::CREATED, Json(line)))
}

async fn remove_item(
    State(state): State<Arc<AppState>>,
    _admin: CurrentAdmin,
    Path((id, item_id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    state.sessions.remove_line_item(&id, &item_id).await?;
    Ok(Json(json!({ "message": "Item removed successfully" })))
}

/// The body is optional: no body closes the session now.
async fn end_session(
    State(state): State<Arc<AppState>>,
    _admin: CurrentAdmin,
    Path(id): Path<String>,
    body: Option<Json<CloseSession>>,
) -> ApiResult<Json<ClosedSessionResponse>> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let detail = state.sessions.close(&id, request.end_time).await?;
    let bill = SessionBill::for_session(&detail.session, Utc::now());
    Ok(Json(ClosedSessionResponse {
        session: detail,
        bill,
    }))
}
