use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info, instrument, warn};

use crate::auth::{
    dto::{LoginRequest, RegisterRequest, UpdateProfileRequest},
    password::{hash_password, verify_password},
    repo::UserRepo,
    repo_types::{NewUser, User, UserChanges},
};
use crate::error::{AppError, AuthFailure};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Argon2 is CPU bound; keep it off the async workers.
async fn hash_off_thread(plain: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .map_err(|e| AppError::internal("hashing the password", e))?
        .map_err(|e| AppError::internal("hashing the password", e))
}

async fn verify_off_thread(plain: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_password(&plain, &hash))
        .await
        .map_err(|e| AppError::internal("verifying the password", e))?
        .map_err(|e| AppError::internal("verifying the password", e))
}

lazy_static! {
    /// Stand-in hash for logins with an unknown email, so that path pays for
    /// one Argon2 verify like a wrong password does.
    static ref DUMMY_HASH: Option<String> = hash_password("staybook-no-such-user").ok();
}

async fn verify_against_dummy(plain: String) -> Result<(), AppError> {
    tokio::task::spawn_blocking(move || {
        if let Some(hash) = DUMMY_HASH.as_deref() {
            let _ = verify_password(&plain, hash);
        }
    })
    .await
    .map_err(|e| AppError::internal("verifying the password", e))
}

/// Password hashing plus user records keyed by email.
#[derive(Clone)]
pub struct CredentialStore {
    users: Arc<dyn UserRepo>,
}

impl CredentialStore {
    pub fn new(users: Arc<dyn UserRepo>) -> Self {
        Self { users }
    }

    #[instrument(skip(self, req))]
    pub async fn register(&self, req: RegisterRequest) -> Result<User, AppError> {
        let (Some(email), Some(password)) = (non_empty(req.email), non_empty(req.password)) else {
            warn!("signup missing email or password");
            return Err(AppError::validation("Email and password are required."));
        };
        if !is_valid_email(&email) {
            warn!(email = %email, "invalid email");
            return Err(AppError::validation("Invalid email"));
        }

        let password_hash = hash_off_thread(password).await?;
        let user = self
            .users
            .insert(NewUser {
                email,
                password_hash,
                phone_number: non_empty(req.phone_number),
                profile_picture: non_empty(req.profile_picture),
            })
            .await
            .map_err(|e| AppError::from_store(e, "registering the user"))?;

        info!(user_id = user.user_id, email = %user.email, "user registered");
        Ok(user)
    }

    /// Unknown email and wrong password fail identically.
    #[instrument(skip(self, req))]
    pub async fn verify_credentials(&self, req: LoginRequest) -> Result<User, AppError> {
        let (Some(email), Some(password)) = (non_empty(req.email), non_empty(req.password)) else {
            return Err(AppError::validation("Email and password are required."));
        };

        let user = match self
            .users
            .find_by_email(&email)
            .await
            .map_err(|e| AppError::from_store(e, "logging in"))?
        {
            Some(u) => u,
            None => {
                warn!(email = %email, "login unknown email");
                verify_against_dummy(password).await?;
                return Err(AppError::Authentication(AuthFailure::Credentials));
            }
        };

        if !verify_off_thread(password, user.password_hash.clone()).await? {
            warn!(user_id = user.user_id, "login invalid password");
            return Err(AppError::Authentication(AuthFailure::Credentials));
        }

        debug!(user_id = user.user_id, "credentials verified");
        Ok(user)
    }

    #[instrument(skip(self, req))]
    pub async fn update_profile(
        &self,
        user_id: i32,
        req: UpdateProfileRequest,
    ) -> Result<User, AppError> {
        if let Some(email) = &req.email {
            if !is_valid_email(email) {
                return Err(AppError::validation("Invalid email"));
            }
        }
        let password_hash = match req.password {
            Some(p) if p.is_empty() => {
                return Err(AppError::validation("Password must not be empty"));
            }
            Some(p) => Some(hash_off_thread(p).await?),
            None => None,
        };

        let changes = UserChanges {
            email: req.email,
            password_hash,
            phone_number: req.phone_number,
            profile_picture: req.profile_picture,
        };
        let user = self
            .users
            .update(user_id, changes)
            .await
            .map_err(|e| AppError::from_store(e, "updating the user profile"))?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        info!(user_id, "user profile updated");
        Ok(user)
    }
}
