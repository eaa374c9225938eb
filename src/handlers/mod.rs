pub mod admin;
pub mod bookings;
pub mod extract;
pub mod health;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::errors::{AppError, BookingError};
use crate::models::BookingForm;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/api/bookings",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route("/api/available-times", get(bookings::available_times))
        .route("/api/admin/login", post(admin::login))
        .route("/api/admin/logout", post(admin::logout))
        .route(
            "/api/admin/bookings/:id",
            get(admin::get_booking)
                .put(admin::update_booking)
                .delete(admin::delete_booking),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Validation and conflict failures echo the submitted form back so the
/// client can re-display it.
fn reject(error: BookingError, form: BookingForm) -> AppError {
    match error {
        BookingError::Validation(_) | BookingError::Conflict { .. } => {
            tracing::debug!(code = error.code(), "booking rejected");
            AppError::rejected(error, form)
        }
        other => other.into(),
    }
}
