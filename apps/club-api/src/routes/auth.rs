//! `/api/auth`: registration, login and the current admin.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use cue_core::{Admin, NewAdmin};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::CurrentAdmin;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewAdmin>,
) -> ApiResult<(StatusCode, Json<Admin>)> {
    let admin = state.db.admins().create(&input, false).await?;
    Ok((StatusCode::CREATED, Json(admin)))
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(input): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let admin = state
        .db
        .admins()
        .authenticate(&input.username, &input.password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Incorrect username or password"))?;

    let access_token = state.jwt.generate_access_token(&admin.username)?;
    info!(username = %admin.username, "Admin logged in");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
        expires_in: state.jwt.access_lifetime_secs(),
    }))
}

async fn me(CurrentAdmin(admin): CurrentAdmin) -> Json<Admin> {
    Json(admin)
}
