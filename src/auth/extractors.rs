use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::jwt::JwtKeys;
use crate::{error::ApiError, state::AppState};

/// Raw bearer token from the Authorization header, if any.
///
/// Never rejects; the handler decides whether a token is needed once the
/// path has been validated.
pub struct BearerToken(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer ").or_else(|| h.strip_prefix("bearer ")))
            .map(|t| t.trim().to_owned());
        Ok(BearerToken(token))
    }
}

impl BearerToken {
    /// Check that the caller owns `user_id`.
    ///
    /// A no-op unless the service runs with `AUTH_REQUIRED`.
    pub fn authorize(&self, state: &AppState, user_id: i32) -> Result<(), ApiError> {
        if !state.config.auth_required {
            return Ok(());
        }
        let token = self.0.as_deref().ok_or(ApiError::Unauthorized)?;
        let claims = JwtKeys::from_ref(state).verify(token).map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            ApiError::Unauthorized
        })?;
        if claims.id != user_id {
            warn!(token_user = claims.id, path_user = user_id, "token subject mismatch");
            return Err(ApiError::Forbidden);
        }
        Ok(())
    }
}
