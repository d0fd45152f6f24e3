use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hotell_core::BookingError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error("{0}")]
    InvalidBody(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::Booking(err) if err.is_validation() => StatusCode::BAD_REQUEST,
            AppError::Booking(BookingError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Booking(BookingError::InventoryExceeded { .. })
            | AppError::Booking(BookingError::CancellationWindowViolation { .. }) => StatusCode::CONFLICT,
            AppError::Booking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidBody(_) => "InvalidBody",
            AppError::Booking(err) => err.kind(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Internal Server Error: {}", self);
            "Internal Server Error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": self.kind(),
            "message": message,
        }));

        (status, body).into_response()
    }
}
