use serde::Serialize;
use sqlx::FromRow;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: i32,
    pub email: String,
    #[sqlx(rename = "password")]
    pub password_hash: String, // Argon2 PHC string, never the plaintext
    pub phone_number: Option<String>,
    pub profile_picture: Option<String>,
}

/// Row to insert at signup; the hash is computed before it reaches the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub phone_number: Option<String>,
    pub profile_picture: Option<String>,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub phone_number: Option<String>,
    pub profile_picture: Option<String>,
}

/// Public part of the user returned to the client.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PublicUser {
    pub user_id: i32,
    pub email: String,
    pub phone_number: Option<String>,
    pub profile_picture: Option<String>,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            user_id: u.user_id,
            email: u.email,
            phone_number: u.phone_number,
            profile_picture: u.profile_picture,
        }
    }
}
