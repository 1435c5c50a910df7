use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct Booking {
    pub booking_id: i32,
    pub user_id: i32, // owner, fixed at creation
    pub hotel_id: i32,
    #[serde(with = "iso_date")]
    pub start_date: Date,
    #[serde(with = "iso_date")]
    pub end_date: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub created_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_time: OffsetDateTime,
}

/// Validated hotel and date fields, shared by create and update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingDraft {
    pub hotel_id: i32,
    pub start_date: Date,
    pub end_date: Date,
}
