use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{BookingListResponse, BookingRequest, BookingResponse, MessageResponse};
use crate::{auth::AuthUser, error::AppError, state::AppState};

pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", get(list_bookings).post(create_booking))
        .route("/bookings/:booking_id", put(update_booking).delete(delete_booking))
}

#[instrument(skip_all, fields(user_id = user.user_id))]
pub async fn create_booking(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let Json(payload) = payload?;
    let draft = payload.validate()?;
    let booking = state
        .bookings
        .create(user.user_id, draft)
        .await
        .map_err(|e| AppError::from_store(e, "creating the booking"))?;

    info!(booking_id = booking.booking_id, "booking created");
    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            message: "Booking created successfully",
            booking,
        }),
    ))
}

#[instrument(skip_all, fields(user_id = user.user_id))]
pub async fn list_bookings(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<BookingListResponse>, AppError> {
    let bookings = state
        .bookings
        .list_by_owner(user.user_id)
        .await
        .map_err(|e| AppError::from_store(e, "retrieving the bookings"))?;
    Ok(Json(BookingListResponse {
        message: "Bookings retrieved successfully",
        bookings,
    }))
}

#[instrument(skip_all, fields(user_id = user.user_id))]
pub async fn update_booking(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    booking_id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<Json<BookingResponse>, AppError> {
    let Path(booking_id) = booking_id?;
    let Json(payload) = payload?;
    let draft = payload.validate()?;
    let booking = state
        .bookings
        .update_if_owned(booking_id, user.user_id, draft)
        .await
        .map_err(|e| AppError::from_store(e, "updating the booking"))?
        .ok_or_else(|| AppError::not_found("Booking not found"))?;

    info!(booking_id, "booking updated");
    Ok(Json(BookingResponse {
        message: "Booking updated successfully",
        booking,
    }))
}

#[instrument(skip_all, fields(user_id = user.user_id))]
pub async fn delete_booking(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    booking_id: Result<Path<i32>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(booking_id) = booking_id?;
    let deleted = state
        .bookings
        .delete_if_owned(booking_id, user.user_id)
        .await
        .map_err(|e| AppError::from_store(e, "deleting the booking"))?;
    if !deleted {
        return Err(AppError::not_found("Booking not found"));
    }

    info!(booking_id, "booking deleted");
    Ok(Json(MessageResponse {
        message: "Booking deleted successfully",
    }))
}
