pub mod admin;
pub mod assistant;
pub mod bookings;
pub mod health;
pub mod spaces;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/api/spaces", get(spaces::list_spaces))
        .route("/api/bookings", post(bookings::create_booking))
        .route("/api/bookings/user/:user_id", get(bookings::user_bookings))
        .route("/api/assistant", post(assistant::assistant_query))
        .route("/api/assistant/search", post(assistant::interpret_search))
        .route("/api/admin/spaces", post(admin::add_space))
        .route("/api/admin/bookings/recent", get(admin::recent_bookings))
        .route("/api/admin/stats", get(admin::get_stats))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
