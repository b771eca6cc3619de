use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::{jwt::JwtKeys, repo_types::User};
use crate::{error::AppError, state::AppState};

/// Resolve a bearer token to the account it was issued for.
///
/// Fails closed: a bad token and a token for a deleted account are both
/// `Unauthenticated`.
pub async fn resolve_current_user(state: &AppState, token: &str) -> Result<User, AppError> {
    let keys = JwtKeys::from_ref(state);
    let user_id = keys.verify(token).map_err(|_| AppError::Unauthenticated)?;

    match state.users.find_by_id(user_id).await? {
        Some(user) => Ok(user),
        None => {
            warn!(user_id, "token subject no longer exists");
            Err(AppError::Unauthenticated)
        }
    }
}

/// The authenticated caller, loaded from the `Authorization: Bearer` header.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| {
                warn!("missing Authorization header");
                AppError::Unauthenticated
            })?;

        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or_else(|| {
                warn!("invalid auth scheme");
                AppError::Unauthenticated
            })?;

        resolve_current_user(state, token.trim()).await.map(CurrentUser)
    }
}
