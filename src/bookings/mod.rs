pub mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;

use crate::state::AppState;
use axum::Router;

pub use repo::{BookingRepo, PgBookingRepo};
pub use repo_types::{Booking, BookingDraft};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::booking_routes())
}
