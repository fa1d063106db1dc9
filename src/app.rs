use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::bookings::{create_booking_handler, list_bookings_handler};
use crate::db::repository::BookingRepository;

/// Shared handles injected into every request handler.
///
/// The repository is opened at startup and owned here; handlers never reach
/// for a global connection.
#[derive(Clone)]
pub struct AppState {
    pub booking_repo: Arc<dyn BookingRepository>,
}

impl AppState {
    pub fn new(booking_repo: Arc<dyn BookingRepository>) -> Self {
        Self { booking_repo }
    }
}

/// Build the Axum router with the booking routes, request tracing and an
/// open CORS policy for the mobile client.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/bookings",
            get(list_bookings_handler).post(create_booking_handler),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
