use std::sync::{Arc, MutexGuard};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use super::spaces::SpaceResponse;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::amenity::normalize_tag;
use crate::models::{BookingRecord, NewSpace};
use crate::state::AppState;

fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

fn lock_db(state: &AppState) -> Result<MutexGuard<'_, Connection>, AppError> {
    state
        .db
        .lock()
        .map_err(|_| AppError::Internal(anyhow::anyhow!("database mutex poisoned")))
}

// POST /api/admin/spaces
pub async fn add_space(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(mut body): Json<NewSpace>,
) -> Result<(StatusCode, Json<SpaceResponse>), AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    if body.name.trim().is_empty() || body.city.trim().is_empty() {
        return Err(AppError::BadRequest("name and city are required".to_string()));
    }
    if body.price_per_day <= 0.0 {
        return Err(AppError::BadRequest("pricePerDay must be positive".to_string()));
    }

    let mut amenities: Vec<String> = Vec::with_capacity(body.amenities.len());
    for tag in body.amenities.iter().map(|a| normalize_tag(a)) {
        if !tag.is_empty() && !amenities.contains(&tag) {
            amenities.push(tag);
        }
    }
    body.amenities = amenities;

    let space = {
        let db = lock_db(&state)?;
        queries::insert_space(&db, &body)?
    };

    tracing::info!(space_id = space.id, name = %space.name, "space added");

    Ok((StatusCode::CREATED, Json(space.into())))
}

// GET /api/admin/bookings/recent
#[derive(Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

pub async fn recent_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<BookingRecord>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let limit = query.limit.unwrap_or(5).clamp(1, 100);
    let bookings = {
        let db = lock_db(&state)?;
        queries::get_recent_bookings(&db, limit)?
    };

    Ok(Json(bookings))
}

// GET /api/admin/stats
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    total_bookings: i64,
    active_bookings: i64,
}

pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<StatsResponse>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let (total_bookings, active_bookings) = {
        let db = lock_db(&state)?;
        queries::count_bookings(&db)?
    };

    Ok(Json(StatsResponse {
        total_bookings,
        active_bookings,
    }))
}
