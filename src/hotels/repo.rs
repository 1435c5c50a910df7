use async_trait::async_trait;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::error::StoreError;

/// Read-only reference data; nothing in the service writes hotels.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct Hotel {
    pub hotel_id: i32,
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[async_trait]
pub trait HotelRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<Hotel>, StoreError>;
    async fn find_by_id(&self, hotel_id: i32) -> Result<Option<Hotel>, StoreError>;
}

#[derive(Clone)]
pub struct PgHotelRepo {
    db: PgPool,
}

impl PgHotelRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HotelRepo for PgHotelRepo {
    async fn list(&self) -> Result<Vec<Hotel>, StoreError> {
        let rows = sqlx::query_as::<_, Hotel>(
            r#"
            SELECT hotel_id, name, location, description, image_url
            FROM hotels
            ORDER BY hotel_id
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, hotel_id: i32) -> Result<Option<Hotel>, StoreError> {
        let row = sqlx::query_as::<_, Hotel>(
            r#"
            SELECT hotel_id, name, location, description, image_url
            FROM hotels
            WHERE hotel_id = $1
            "#,
        )
        .bind(hotel_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }
}
