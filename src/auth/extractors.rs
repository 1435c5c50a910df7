use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::{debug, warn};

use super::{claims::Identity, jwt::JwtKeys};
use crate::error::{AppError, AuthFailure};

/// Verified caller identity. Taking this as a handler argument gates the
/// route: the handler body never runs without a valid token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

/// The header carries the raw token; a `Bearer ` prefix is tolerated.
pub(crate) fn token_from_header(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .unwrap_or(value)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = match parts.headers.get(AUTHORIZATION) {
            Some(h) => h,
            None => {
                debug!("request without Authorization header");
                return Err(AppError::Authentication(AuthFailure::MissingToken));
            }
        };
        let raw = header.to_str().map_err(|_| {
            warn!("non-ascii Authorization header");
            AppError::Authentication(AuthFailure::InvalidToken)
        })?;

        let token = token_from_header(raw);
        if token.is_empty() {
            return Err(AppError::Authentication(AuthFailure::MissingToken));
        }

        let keys = JwtKeys::from_ref(state);
        let identity = keys.verify(token).map_err(AppError::Authentication)?;

        Ok(AuthUser(identity))
    }
}
