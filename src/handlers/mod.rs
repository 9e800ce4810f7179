pub mod auth;
pub mod bookings;
pub mod catalog;
pub mod customers;
pub mod health;

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/customers", get(customers::list_customers))
        .route("/customers/delete/:id", delete(customers::delete_customer))
        .route("/bookings", get(bookings::list_bookings))
        .route("/bookings/delete/:id", delete(bookings::delete_booking))
        .route("/bookings/accept/:id", put(bookings::accept_booking))
        .route("/submit-booking", post(bookings::submit_booking))
        .route("/booked-times", post(bookings::booked_times))
        .route("/services", get(catalog::list_services))
        .route("/totals", get(catalog::totals))
        .route("/income", get(catalog::income))
        .route("/login", post(auth::login))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
