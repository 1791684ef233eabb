use serde::{Deserialize, Serialize};

use super::amenity::{amenity_for, Amenity};

/// A coworking-space listing as read from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub address: String,
    pub price_per_day: f64,
    pub rating: f64,
    pub image_url: Option<String>,
    pub amenities: Vec<String>,
    pub description: Option<String>,
}

impl CatalogEntry {
    pub fn amenity_details(&self) -> Vec<Amenity> {
        self.amenities.iter().map(|a| amenity_for(a)).collect()
    }
}

/// Payload for adding a listing to the catalog.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSpace {
    pub name: String,
    pub city: String,
    pub address: String,
    pub price_per_day: f64,
    #[serde(default)]
    pub rating: f64,
    pub image_url: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub description: Option<String>,
}
