use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::services::ai::Interpreter;
use crate::services::catalog::{BookingBackend, Catalog};

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub interpreter: Interpreter,
    pub catalog: Arc<dyn Catalog>,
    pub bookings: Arc<dyn BookingBackend>,
}
