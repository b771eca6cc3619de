use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{CreateFlashcardRequest, ListQuery, SearchQuery, UpdateFlashcardRequest},
    repo_types::FlashcardView,
    services,
};
use crate::{
    auth::CurrentUser,
    error::AppResult,
    extract::{ApiJson, ApiPath, ApiQuery},
    state::AppState,
};

pub fn flashcard_routes() -> Router<AppState> {
    Router::new()
        .route("/flashcards", get(list_flashcards).post(create_flashcard))
        .route("/flashcards/search", get(search_flashcards))
        .route("/flashcards/:id", put(update_flashcard).delete(delete_flashcard))
}

#[instrument(skip_all, fields(user_id = user.id, category_id = ?q.category_id))]
pub async fn list_flashcards(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiQuery(q): ApiQuery<ListQuery>,
) -> AppResult<Json<Vec<FlashcardView>>> {
    Ok(Json(services::list_flashcards(&state, &user, q.category_id).await?))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn search_flashcards(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiQuery(q): ApiQuery<SearchQuery>,
) -> AppResult<Json<Vec<FlashcardView>>> {
    Ok(Json(services::search_flashcards(&state, &user, &q.q).await?))
}

#[instrument(skip_all, fields(user_id = user.id, category_id = body.category_id))]
pub async fn create_flashcard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(body): ApiJson<CreateFlashcardRequest>,
) -> AppResult<(StatusCode, Json<FlashcardView>)> {
    let card =
        services::create_flashcard(&state, &user, &body.question, &body.answer, body.category_id)
            .await?;
    Ok((StatusCode::CREATED, Json(card)))
}

#[instrument(skip_all, fields(user_id = user.id, flashcard_id = id))]
pub async fn update_flashcard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<UpdateFlashcardRequest>,
) -> AppResult<Json<FlashcardView>> {
    Ok(Json(services::update_flashcard(&state, &user, id, body.into()).await?))
}

#[instrument(skip_all, fields(user_id = user.id, flashcard_id = id))]
pub async fn delete_flashcard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    services::delete_flashcard(&state, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
