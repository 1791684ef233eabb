use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::amenity::normalize_tag;
use crate::models::{Amenity, CatalogEntry, SearchCriteria};
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceResponse {
    id: i64,
    name: String,
    city: String,
    address: String,
    price_per_day: f64,
    rating: f64,
    image_url: Option<String>,
    amenities: Vec<Amenity>,
    description: Option<String>,
}

impl From<CatalogEntry> for SpaceResponse {
    fn from(space: CatalogEntry) -> Self {
        let amenities = space.amenity_details();
        Self {
            id: space.id,
            name: space.name,
            city: space.city,
            address: space.address,
            price_per_day: space.price_per_day,
            rating: space.rating,
            image_url: space.image_url,
            amenities,
            description: space.description,
        }
    }
}

// GET /api/spaces?city=Madrid&amenities=wifi,cafe
#[derive(Deserialize)]
pub struct SpacesQuery {
    pub city: Option<String>,
    pub amenities: Option<String>,
}

pub async fn list_spaces(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SpacesQuery>,
) -> Result<Json<Vec<SpaceResponse>>, AppError> {
    let amenities = query
        .amenities
        .as_deref()
        .unwrap_or("")
        .split(',')
        .map(normalize_tag)
        .collect();
    let filter = SearchCriteria::new(query.city, amenities);

    let spaces = state.catalog.list_spaces(&filter).await?;

    Ok(Json(spaces.into_iter().map(SpaceResponse::from).collect()))
}
