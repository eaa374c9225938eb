use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::errors::{AppError, BookingError, ValidationError};
use crate::models::{BookingForm, BookingView, Slot};
use crate::state::AppState;

use super::extract::{AppJson, AppQuery};
use super::reject;

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    AppJson(form): AppJson<BookingForm>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let booking = state.bookings.create(&form).map_err(|e| reject(e, form))?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "message": "Cita creada con éxito!",
            "booking": booking,
        })),
    ))
}

// GET /api/bookings
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BookingView>>, AppError> {
    Ok(Json(state.bookings.list()?))
}

// GET /api/available-times?date=YYYY-MM-DD
#[derive(Deserialize)]
pub struct AvailableQuery {
    pub date: Option<String>,
}

pub async fn available_times(
    State(state): State<Arc<AppState>>,
    AppQuery(query): AppQuery<AvailableQuery>,
) -> Result<Json<Vec<Slot>>, AppError> {
    let date = query
        .date
        .ok_or(BookingError::Validation(ValidationError::InvalidDate))?;

    Ok(Json(state.bookings.available_slots(&date)?))
}
