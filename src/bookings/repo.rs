use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{Booking, BookingDraft};
use crate::error::StoreError;

/// Ownership-scoped booking storage. Every targeted operation matches on
/// both `booking_id` and the owner, so a booking owned by someone else looks
/// exactly like one that does not exist.
#[async_trait]
pub trait BookingRepo: Send + Sync {
    /// Fails with `StoreError::MissingReference("hotel")` for an unknown hotel.
    async fn create(&self, owner_id: i32, draft: BookingDraft) -> Result<Booking, StoreError>;
    async fn list_by_owner(&self, owner_id: i32) -> Result<Vec<Booking>, StoreError>;
    async fn update_if_owned(
        &self,
        booking_id: i32,
        owner_id: i32,
        draft: BookingDraft,
    ) -> Result<Option<Booking>, StoreError>;
    /// Returns `false` when nothing matched.
    async fn delete_if_owned(&self, booking_id: i32, owner_id: i32) -> Result<bool, StoreError>;
}

#[derive(Clone)]
pub struct PgBookingRepo {
    db: PgPool,
}

impl PgBookingRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookingRepo for PgBookingRepo {
    async fn create(&self, owner_id: i32, draft: BookingDraft) -> Result<Booking, StoreError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (user_id, hotel_id, start_date, end_date, created_time, updated_time)
            VALUES ($1, $2, $3, $4, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
            RETURNING booking_id, user_id, hotel_id, start_date, end_date, created_time, updated_time
            "#,
        )
        .bind(owner_id)
        .bind(draft.hotel_id)
        .bind(draft.start_date)
        .bind(draft.end_date)
        .fetch_one(&self.db)
        .await?;
        Ok(booking)
    }

    async fn list_by_owner(&self, owner_id: i32) -> Result<Vec<Booking>, StoreError> {
        let rows = sqlx::query_as::<_, Booking>(
            r#"
            SELECT booking_id, user_id, hotel_id, start_date, end_date, created_time, updated_time
            FROM bookings
            WHERE user_id = $1
            ORDER BY created_time ASC, booking_id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn update_if_owned(
        &self,
        booking_id: i32,
        owner_id: i32,
        draft: BookingDraft,
    ) -> Result<Option<Booking>, StoreError> {
        let row = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
               SET hotel_id = $1,
                   start_date = $2,
                   end_date = $3,
                   updated_time = CURRENT_TIMESTAMP
             WHERE booking_id = $4 AND user_id = $5
            RETURNING booking_id, user_id, hotel_id, start_date, end_date, created_time, updated_time
            "#,
        )
        .bind(draft.hotel_id)
        .bind(draft.start_date)
        .bind(draft.end_date)
        .bind(booking_id)
        .bind(owner_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete_if_owned(&self, booking_id: i32, owner_id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM bookings
             WHERE booking_id = $1 AND user_id = $2
            "#,
        )
        .bind(booking_id)
        .bind(owner_id)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
