use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::repo_types::{NewUser, User, UserChanges};
use crate::error::StoreError;

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_id(&self, user_id: i32) -> Result<Option<User>, StoreError>;
    /// Fails with `StoreError::Duplicate("email")` when the email is taken.
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;
    /// Returns `None` when no row has `user_id`.
    async fn update(
        &self,
        user_id: i32,
        changes: UserChanges,
    ) -> Result<Option<User>, StoreError>;
}

#[derive(Clone)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, email, password, phone_number, profile_picture
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, user_id: i32) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, email, password, phone_number, profile_picture
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password, phone_number, profile_picture)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO NOTHING
            RETURNING user_id, email, password, phone_number, profile_picture
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone_number)
        .bind(&user.profile_picture)
        .fetch_optional(&self.db)
        .await?
        .ok_or(StoreError::Duplicate("email"))
    }

    async fn update(
        &self,
        user_id: i32,
        changes: UserChanges,
    ) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET email = COALESCE($1, email),
                   password = COALESCE($2, password),
                   phone_number = COALESCE($3, phone_number),
                   profile_picture = COALESCE($4, profile_picture)
             WHERE user_id = $5
            RETURNING user_id, email, password, phone_number, profile_picture
            "#,
        )
        .bind(changes.email)
        .bind(changes.password_hash)
        .bind(changes.phone_number)
        .bind(changes.profile_picture)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }
}
