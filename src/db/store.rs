use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db::queries;
use crate::errors::BookingError;
use crate::models::{BookingRecord, BookingStatus, CatalogEntry, SearchCriteria};
use crate::services::catalog::{BookingBackend, Catalog};

/// SQLite-backed catalog and booking collaborator.
#[derive(Clone)]
pub struct SqliteStore {
    db: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }

    fn conn(&self) -> anyhow::Result<MutexGuard<'_, Connection>> {
        self.db
            .lock()
            .map_err(|_| anyhow::anyhow!("database mutex poisoned"))
    }
}

#[async_trait]
impl Catalog for SqliteStore {
    async fn list_spaces(&self, filter: &SearchCriteria) -> anyhow::Result<Vec<CatalogEntry>> {
        let db = self.conn()?;
        queries::list_spaces(&db, filter)
    }
}

#[async_trait]
impl BookingBackend for SqliteStore {
    async fn create_booking(
        &self,
        space_id: i64,
        actor_id: i64,
        date: &str,
    ) -> Result<BookingRecord, BookingError> {
        if date.len() != 10 || NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            return Err(BookingError::InvalidDate(date.to_string()));
        }

        let db = self.conn()?;

        if queries::get_user(&db, actor_id)?.is_none() {
            return Err(BookingError::UnknownActor(actor_id));
        }
        if queries::get_space(&db, space_id)?.is_none() {
            return Err(BookingError::SpaceNotFound(space_id));
        }

        let booking =
            queries::create_booking(&db, space_id, actor_id, date, &BookingStatus::Confirmed)?;
        Ok(booking)
    }

    async fn list_bookings_for_actor(
        &self,
        actor_id: i64,
    ) -> Result<Vec<BookingRecord>, BookingError> {
        let db = self.conn()?;
        Ok(queries::get_bookings_for_user(&db, actor_id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn store() -> SqliteStore {
        let conn = db::init_db(":memory:").unwrap();
        SqliteStore::new(Arc::new(Mutex::new(conn)))
    }

    #[tokio::test]
    async fn test_create_booking_validates_inputs() {
        let store = store();

        let err = store.create_booking(2, 3, "26/07/2025").await.unwrap_err();
        assert!(matches!(err, BookingError::InvalidDate(_)));

        let err = store.create_booking(2, 99, "2025-07-26").await.unwrap_err();
        assert!(matches!(err, BookingError::UnknownActor(99)));

        let err = store.create_booking(99, 3, "2025-07-26").await.unwrap_err();
        assert!(matches!(err, BookingError::SpaceNotFound(99)));

        assert!(store.list_bookings_for_actor(3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_booking_round_trip() {
        let store = store();
        let booking = store.create_booking(2, 3, "2025-07-26").await.unwrap();
        assert_eq!(booking.status, BookingStatus::Confirmed);

        let bookings = store.list_bookings_for_actor(3).await.unwrap();
        assert_eq!(bookings, vec![booking]);
    }

    #[tokio::test]
    async fn test_catalog_filter() {
        let store = store();
        let filter = SearchCriteria::new(Some("Barcelona".to_string()), vec![]);
        let spaces = store.list_spaces(&filter).await.unwrap();
        assert_eq!(spaces.len(), 1);
        assert_eq!(spaces[0].name, "BCN Hub Creativo");
    }
}
