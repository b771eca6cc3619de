use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::{
    auth::{
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo_types::User,
    },
    error::{AppError, AppResult},
    state::AppState,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Create an account. The email is stored exactly as given.
pub async fn register(state: &AppState, email: &str, password: &str) -> AppResult<User> {
    if !is_valid_email(email) {
        warn!(%email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }
    if password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }

    let hash = hash_password(password)?;
    let user = state
        .users
        .create(email, &hash)
        .await?
        .ok_or_else(|| {
            warn!(%email, "email already registered");
            AppError::DuplicateEmail
        })?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok(user)
}

/// Check credentials and issue an access token.
pub async fn authenticate(state: &AppState, keys: &JwtKeys, email: &str, password: &str) -> AppResult<String> {
    let Some(user) = state.users.find_by_email(email).await? else {
        warn!(%email, "login unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(%email, user_id = user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let token = keys.sign(user.id)?;
    info!(user_id = user.id, "user logged in");
    Ok(token)
}

/// Remove the account and, transitively, all of its categories and flashcards.
pub async fn delete_account(state: &AppState, user: &User) -> AppResult<()> {
    if !state.users.delete(user.id).await? {
        return Err(AppError::Unauthenticated);
    }
    info!(user_id = user.id, "user deleted");
    Ok(())
}
