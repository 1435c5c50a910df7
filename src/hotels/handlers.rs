use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::instrument;

use super::repo::Hotel;
use crate::{auth::AuthUser, error::AppError, state::AppState};

#[derive(Debug, Serialize)]
pub struct HotelListResponse {
    pub message: &'static str,
    pub hotels: Vec<Hotel>,
}

pub fn hotel_routes() -> Router<AppState> {
    Router::new()
        .route("/hotels", get(list_hotels))
        .route("/hotels/:hotel_id", get(get_hotel))
}

#[instrument(skip(state))]
pub async fn list_hotels(
    State(state): State<AppState>,
) -> Result<Json<HotelListResponse>, AppError> {
    let hotels = state
        .hotels
        .list()
        .await
        .map_err(|e| AppError::from_store(e, "retrieving hotels"))?;
    Ok(Json(HotelListResponse {
        message: "Hotels retrieved successfully",
        hotels,
    }))
}

#[instrument(skip_all, fields(user_id = user.user_id))]
pub async fn get_hotel(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    hotel_id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Hotel>, AppError> {
    let Path(hotel_id) = hotel_id?;
    let hotel = state
        .hotels
        .find_by_id(hotel_id)
        .await
        .map_err(|e| AppError::from_store(e, "retrieving the hotel"))?
        .ok_or_else(|| AppError::not_found("Hotel not found"))?;
    Ok(Json(hotel))
}
