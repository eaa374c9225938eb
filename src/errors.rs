use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::NaiveDate;

use crate::db::StoreError;
use crate::models::{BookingForm, Slot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required fields")]
    MissingFields,

    #[error("invalid date")]
    InvalidDate,

    #[error("invalid time")]
    InvalidTime,

    #[error("date is in the past")]
    PastDate,

    #[error("weekends are not bookable")]
    WeekendNotAllowed,
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingFields => "missing_fields",
            ValidationError::InvalidDate => "invalid_date",
            ValidationError::InvalidTime => "invalid_time",
            ValidationError::PastDate => "past_date",
            ValidationError::WeekendNotAllowed => "weekend_not_allowed",
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            ValidationError::MissingFields => "Por favor completa todos los campos.",
            ValidationError::InvalidDate => "Fecha inválida.",
            ValidationError::InvalidTime => "Hora inválida.",
            ValidationError::PastDate => "No puedes seleccionar una fecha pasada.",
            ValidationError::WeekendNotAllowed => {
                "Solo se pueden agendar citas de Lunes a Viernes."
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("slot {date} {time} is already booked")]
    Conflict { date: NaiveDate, time: Slot },

    #[error("booking not found: {0}")]
    NotFound(i64),

    #[error("persistence error: {0}")]
    Persistence(String),
}

impl BookingError {
    pub fn code(&self) -> &'static str {
        match self {
            BookingError::Validation(v) => v.code(),
            BookingError::Conflict { .. } => "slot_taken",
            BookingError::NotFound(_) => "not_found",
            BookingError::Persistence(_) => "persistence_error",
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            BookingError::Validation(v) => v.user_message().to_string(),
            BookingError::Conflict { date, time } => {
                format!("Lo siento, {date} a las {time} ya está reservado.")
            }
            BookingError::NotFound(_) => "Cita no encontrada.".to_string(),
            BookingError::Persistence(_) => {
                "No se pudo guardar la cita. Intenta de nuevo.".to_string()
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::Conflict { .. } => StatusCode::CONFLICT,
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Store errors for a write aimed at `(date, time)`.
    pub fn from_store(err: StoreError, date: NaiveDate, time: Slot) -> Self {
        match err {
            StoreError::SlotTaken => BookingError::Conflict { date, time },
            other => other.into(),
        }
    }
}

impl From<StoreError> for BookingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => BookingError::NotFound(id),
            other => BookingError::Persistence(other.to_string()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error("{error}")]
    Rejected {
        error: BookingError,
        input: BookingForm,
    },

    #[error("unauthorized")]
    Unauthorized,

    #[error("invalid password")]
    InvalidPassword,

    #[error("malformed request: {detail}")]
    Malformed { status: StatusCode, detail: String },
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Malformed {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Malformed {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Malformed {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl AppError {
    pub fn rejected(error: BookingError, input: BookingForm) -> Self {
        AppError::Rejected { error, input }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Booking(e) => (
                e.status(),
                serde_json::json!({
                    "status": "error",
                    "code": e.code(),
                    "message": e.user_message(),
                }),
            ),
            AppError::Rejected { error, input } => (
                error.status(),
                serde_json::json!({
                    "status": "error",
                    "code": error.code(),
                    "message": error.user_message(),
                    "input": input,
                }),
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                serde_json::json!({
                    "status": "error",
                    "code": "unauthorized",
                    "message": "No autorizado.",
                }),
            ),
            AppError::InvalidPassword => (
                StatusCode::UNAUTHORIZED,
                serde_json::json!({
                    "status": "error",
                    "code": "invalid_password",
                    "message": "Contraseña incorrecta.",
                }),
            ),
            AppError::Malformed { status, detail } => {
                tracing::debug!(%detail, "malformed request");
                (
                    *status,
                    serde_json::json!({
                        "status": "error",
                        "code": "bad_request",
                        "message": "Solicitud inválida.",
                        "detail": detail,
                    }),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}
