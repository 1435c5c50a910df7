pub mod handlers;
pub mod repo;

use crate::state::AppState;
use axum::Router;

pub use repo::{Hotel, HotelRepo, PgHotelRepo};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::hotel_routes())
}
