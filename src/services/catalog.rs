use async_trait::async_trait;

use crate::errors::BookingError;
use crate::models::{BookingRecord, CatalogEntry, SearchCriteria};

/// Read side of the space catalog.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// An empty `filter` returns every listing.
    async fn list_spaces(&self, filter: &SearchCriteria) -> anyhow::Result<Vec<CatalogEntry>>;
}

#[async_trait]
pub trait BookingBackend: Send + Sync {
    async fn create_booking(
        &self,
        space_id: i64,
        actor_id: i64,
        date: &str,
    ) -> Result<BookingRecord, BookingError>;

    async fn list_bookings_for_actor(&self, actor_id: i64)
        -> Result<Vec<BookingRecord>, BookingError>;
}
