use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("{}", .0.user_message())]
    Booking(#[from] BookingError),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Technical description for the logs. Booking errors display their user-facing text,
    /// so the wrapped cause is taken from the inner error instead.
    pub fn log_detail(&self) -> String {
        match self {
            AppError::Booking(e) => e.to_string(),
            AppError::Internal(e) => format!("{e:#}"),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Booking(BookingError::InvalidDate(_)) => StatusCode::BAD_REQUEST,
            AppError::Booking(BookingError::SpaceNotFound(_) | BookingError::UnknownActor(_)) => {
                StatusCode::NOT_FOUND
            }
            AppError::Booking(BookingError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.log_detail(), "request failed");
        }

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

/// Failure of a structured-generation round trip. Never leaves the interpreter.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Remote(#[from] anyhow::Error),

    #[error("generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("generation returned an empty response")]
    EmptyResponse,

    #[error("generation returned malformed output: {0}")]
    Malformed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("space {0} does not exist")]
    SpaceNotFound(i64),

    #[error("user {0} does not exist")]
    UnknownActor(i64),

    #[error("invalid booking date: {0:?}")]
    InvalidDate(String),

    #[error("booking storage failed: {0}")]
    Storage(#[from] anyhow::Error),
}

impl BookingError {
    /// Text that can be shown to the person booking; technical detail stays in the logs.
    pub fn user_message(&self) -> String {
        match self {
            BookingError::SpaceNotFound(_) => {
                "El espacio seleccionado ya no está disponible.".to_string()
            }
            BookingError::UnknownActor(_) => {
                "No encontramos tu cuenta. Vuelve a iniciar sesión e inténtalo de nuevo."
                    .to_string()
            }
            BookingError::InvalidDate(date) => {
                format!("La fecha \"{date}\" no es válida. Usa el formato AAAA-MM-DD.")
            }
            BookingError::Storage(_) => {
                "No pudimos guardar la reserva en este momento. Inténtalo de nuevo.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_error_message_hides_storage_detail() {
        let err = BookingError::Storage(anyhow::anyhow!("disk I/O error at page 42"));
        let msg = err.user_message();
        assert!(!msg.contains("disk"));
        assert!(!msg.contains("42"));
    }

    #[test]
    fn test_storage_failure_keeps_cause_for_logs() {
        let err = AppError::from(BookingError::Storage(anyhow::anyhow!(
            "disk I/O error at page 42"
        )));
        assert!(!err.to_string().contains("disk"));
        assert!(err.log_detail().contains("disk I/O error at page 42"));

        let res = err.into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_date_message_names_iso_format() {
        let msg = BookingError::InvalidDate("26/07/2025".to_string()).user_message();
        assert!(msg.contains("26/07/2025"));
        assert!(msg.contains("AAAA-MM-DD"));
    }

    #[test]
    fn test_app_error_status_codes() {
        let res = AppError::BadRequest("prompt is required".into()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = AppError::Booking(BookingError::SpaceNotFound(9)).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = AppError::Unauthorized.into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
