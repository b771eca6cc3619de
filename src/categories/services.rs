use tracing::{info, warn};

use crate::{
    auth::User,
    categories::repo_types::{Category, CategoryWithCount},
    error::{AppError, AppResult},
    state::AppState,
};

fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("Category name must not be empty".into()));
    }
    Ok(())
}

/// Load a category by id and make sure `user_id` owns it.
///
/// `action` completes the forbidden message, e.g. "update this category".
pub(crate) async fn owned_category(
    state: &AppState,
    user_id: i64,
    id: i64,
    action: &'static str,
) -> AppResult<Category> {
    let category = state
        .categories
        .find(id)
        .await?
        .ok_or(AppError::NotFound("Category"))?;

    if category.user_id != user_id {
        warn!(user_id, category_id = id, owner = category.user_id, "category ownership mismatch");
        return Err(AppError::Forbidden(action));
    }
    Ok(category)
}

pub async fn list_categories(state: &AppState, user: &User) -> AppResult<Vec<CategoryWithCount>> {
    Ok(state.categories.list_with_counts(user.id).await?)
}

pub async fn create_category(state: &AppState, user: &User, name: &str) -> AppResult<CategoryWithCount> {
    validate_name(name)?;
    let category = state.categories.create(user.id, name).await?;
    info!(user_id = user.id, category_id = category.id, "category created");
    Ok(CategoryWithCount::new(category, 0))
}

pub async fn update_category(
    state: &AppState,
    user: &User,
    id: i64,
    name: &str,
) -> AppResult<CategoryWithCount> {
    owned_category(state, user.id, id, "update this category").await?;
    validate_name(name)?;

    let updated = state
        .categories
        .rename(id, name)
        .await?
        .ok_or(AppError::NotFound("Category"))?;
    info!(user_id = user.id, category_id = id, "category renamed");
    Ok(updated)
}

pub async fn delete_category(state: &AppState, user: &User, id: i64) -> AppResult<()> {
    owned_category(state, user.id, id, "delete this category").await?;

    if !state.categories.delete(id).await? {
        return Err(AppError::NotFound("Category"));
    }
    info!(user_id = user.id, category_id = id, "category deleted");
    Ok(())
}
