use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::BookingRecord;
use crate::state::AppState;

// POST /api/bookings
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub space_id: Option<i64>,
    pub user_id: Option<i64>,
    pub date: Option<String>,
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingRecord>), AppError> {
    let (Some(space_id), Some(user_id), Some(date)) = (body.space_id, body.user_id, body.date)
    else {
        return Err(AppError::BadRequest(
            "spaceId, userId and date are required".to_string(),
        ));
    };

    let booking = state
        .bookings
        .create_booking(space_id, user_id, date.trim())
        .await?;

    tracing::info!(booking_id = %booking.id, space_id, user_id, "booking created");

    Ok((StatusCode::CREATED, Json(booking)))
}

// GET /api/bookings/user/:user_id
pub async fn user_bookings(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<BookingRecord>>, AppError> {
    let bookings = state.bookings.list_bookings_for_actor(user_id).await?;
    Ok(Json(bookings))
}
