use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{Booking, BookingForm};
use crate::services::auth::AdminGrant;
use crate::state::AppState;

use super::extract::{AppJson, AppPath};
use super::reject;

fn bearer(headers: &HeaderMap) -> &str {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    auth.strip_prefix("Bearer ").unwrap_or("")
}

fn check_auth(headers: &HeaderMap, state: &AppState) -> Result<AdminGrant, AppError> {
    state
        .sessions
        .authorize(bearer(headers))
        .ok_or(AppError::Unauthorized)
}

// POST /api/admin/login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<LoginRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    match state.sessions.login(&body.password) {
        Some(token) => Ok(Json(serde_json::json!({
            "status": "success",
            "token": token,
        }))),
        None => {
            tracing::warn!("admin login rejected");
            Err(AppError::InvalidPassword)
        }
    }
}

// POST /api/admin/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    if !state.sessions.logout(bearer(&headers)) {
        return Err(AppError::Unauthorized);
    }

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Se cerró sesión exitosamente.",
    })))
}

// GET /api/admin/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Booking>, AppError> {
    let grant = check_auth(&headers, &state)?;
    Ok(Json(state.bookings.get(&grant, id)?))
}

// PUT /api/admin/bookings/:id
pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    AppPath(id): AppPath<i64>,
    AppJson(form): AppJson<BookingForm>,
) -> Result<Json<serde_json::Value>, AppError> {
    let grant = check_auth(&headers, &state)?;

    let booking = state
        .bookings
        .update(&grant, id, &form)
        .map_err(|e| reject(e, form))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Cita actualizada.",
        "booking": booking,
    })))
}

// DELETE /api/admin/bookings/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    AppPath(id): AppPath<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let grant = check_auth(&headers, &state)?;
    state.bookings.delete(&grant, id)?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Cita eliminada exitosamente.",
    })))
}
