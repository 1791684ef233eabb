use chrono::NaiveDate;
use serde::Serialize;

use crate::models::BookingRecord;
use crate::services::catalog::BookingBackend;
use crate::services::resolver::ResolvedBookingTarget;

pub const LOGIN_REQUIRED_MESSAGE: &str = "Para hacer una reserva necesitas iniciar sesión primero.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BookingOutcome {
    Confirmed {
        message: String,
        booking: BookingRecord,
        /// Actor's bookings re-read after the write; `None` if that refresh failed.
        bookings: Option<Vec<BookingRecord>>,
    },
    Failed {
        message: String,
    },
}

impl BookingOutcome {
    pub fn message(&self) -> &str {
        match self {
            BookingOutcome::Confirmed { message, .. } | BookingOutcome::Failed { message } => {
                message
            }
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, BookingOutcome::Confirmed { .. })
    }
}

/// Books `target` for `actor_id`. Without an actor the backend is never called.
pub async fn attempt_booking(
    backend: &dyn BookingBackend,
    target: &ResolvedBookingTarget,
    actor_id: Option<i64>,
) -> BookingOutcome {
    let Some(actor_id) = actor_id else {
        return BookingOutcome::Failed {
            message: LOGIN_REQUIRED_MESSAGE.to_string(),
        };
    };

    let space = target.entry();

    let booking = match backend
        .create_booking(space.id, actor_id, target.date())
        .await
    {
        Ok(booking) => booking,
        Err(e) => {
            tracing::error!(
                error = %e,
                space_id = space.id,
                actor_id,
                date = target.date(),
                "booking write failed"
            );
            return BookingOutcome::Failed {
                message: format!("Hubo un error al procesar tu reserva: {}", e.user_message()),
            };
        }
    };

    tracing::info!(
        booking_id = %booking.id,
        space = %space.name,
        actor_id,
        date = target.date(),
        "booking confirmed"
    );

    let bookings = match backend.list_bookings_for_actor(actor_id).await {
        Ok(bookings) => Some(bookings),
        Err(e) => {
            tracing::warn!(error = %e, actor_id, "failed to refresh bookings after confirmation");
            None
        }
    };

    BookingOutcome::Confirmed {
        message: format!(
            "¡Perfecto! He confirmado tu reserva en {} para el {}. ¡Que disfrutes tu espacio de trabajo!",
            space.name,
            display_date(target.date()),
        ),
        booking,
        bookings,
    }
}

/// `2025-07-26` → `26/07/2025`; anything unparseable is shown as given.
fn display_date(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|_| date.to_string())
}
