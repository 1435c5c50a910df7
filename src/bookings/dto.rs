use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date};

use super::repo_types::{Booking, BookingDraft};
use crate::error::AppError;

/// Body of `POST /bookings` and `PUT /bookings/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct BookingRequest {
    pub hotel_id: Option<i32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn parse_date(field: &str, value: Option<&str>) -> Result<Date, AppError> {
    let value = value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::validation(format!("{field} is required")))?;
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map_err(|_| AppError::validation(format!("{field} must be a date in YYYY-MM-DD format")))
}

impl BookingRequest {
    pub fn validate(&self) -> Result<BookingDraft, AppError> {
        let hotel_id = self
            .hotel_id
            .ok_or_else(|| AppError::validation("hotel_id is required"))?;
        let start_date = parse_date("start_date", self.start_date.as_deref())?;
        let end_date = parse_date("end_date", self.end_date.as_deref())?;
        if end_date < start_date {
            return Err(AppError::validation("end_date must not be before start_date"));
        }
        Ok(BookingDraft {
            hotel_id,
            start_date,
            end_date,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub message: &'static str,
    pub booking: Booking,
}

#[derive(Debug, Serialize)]
pub struct BookingListResponse {
    pub message: &'static str,
    pub bookings: Vec<Booking>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
