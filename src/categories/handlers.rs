use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{CreateCategoryRequest, UpdateCategoryRequest},
    repo_types::CategoryWithCount,
    services,
};
use crate::{
    auth::CurrentUser,
    error::AppResult,
    extract::{ApiJson, ApiPath},
    state::AppState,
};

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/:id", put(update_category).delete(delete_category))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn list_categories(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<CategoryWithCount>>> {
    Ok(Json(services::list_categories(&state, &user).await?))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn create_category(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(body): ApiJson<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<CategoryWithCount>)> {
    let created = services::create_category(&state, &user, &body.name).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip_all, fields(user_id = user.id, category_id = id))]
pub async fn update_category(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<UpdateCategoryRequest>,
) -> AppResult<Json<CategoryWithCount>> {
    Ok(Json(services::update_category(&state, &user, id, &body.name).await?))
}

#[instrument(skip_all, fields(user_id = user.id, category_id = id))]
pub async fn delete_category(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    services::delete_category(&state, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
