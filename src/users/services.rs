use std::sync::Arc;

use tracing::{instrument, warn};

use crate::auth::{
    dto::UpdateProfileRequest,
    repo::UserRepo,
    repo_types::PublicUser,
    services::CredentialStore,
};
use crate::error::AppError;

/// Reads and edits the caller's own profile. Hashes never leave this layer.
#[derive(Clone)]
pub struct ProfileService {
    users: Arc<dyn UserRepo>,
    credentials: CredentialStore,
}

impl ProfileService {
    pub fn new(users: Arc<dyn UserRepo>, credentials: CredentialStore) -> Self {
        Self { users, credentials }
    }

    /// The user may have vanished after the token was issued.
    #[instrument(skip(self))]
    pub async fn get_own_profile(&self, user_id: i32) -> Result<PublicUser, AppError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(|e| AppError::from_store(e, "retrieving user details"))?
            .ok_or_else(|| {
                warn!(user_id, "token subject has no user row");
                AppError::not_found("User not found")
            })?;
        Ok(user.into())
    }

    pub async fn update_own_profile(
        &self,
        user_id: i32,
        req: UpdateProfileRequest,
    ) -> Result<PublicUser, AppError> {
        let user = self.credentials.update_profile(user_id, req).await?;
        Ok(user.into())
    }
}
