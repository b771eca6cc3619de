use tracing::{info, warn};

use crate::{
    auth::User,
    categories::services::owned_category,
    error::{AppError, AppResult},
    flashcards::repo_types::{Flashcard, FlashcardChanges, FlashcardView},
    state::AppState,
};

async fn owned_flashcard(
    state: &AppState,
    user_id: i64,
    id: i64,
    action: &'static str,
) -> AppResult<Flashcard> {
    let card = state
        .flashcards
        .find(id)
        .await?
        .ok_or(AppError::NotFound("FlashCard"))?;

    if card.user_id != user_id {
        warn!(user_id, flashcard_id = id, owner = card.user_id, "flashcard ownership mismatch");
        return Err(AppError::Forbidden(action));
    }
    Ok(card)
}

/// The caller's flashcards. A `category_id` the caller doesn't own simply yields nothing.
pub async fn list_flashcards(
    state: &AppState,
    user: &User,
    category_id: Option<i64>,
) -> AppResult<Vec<FlashcardView>> {
    Ok(state.flashcards.list(user.id, category_id).await?)
}

pub async fn search_flashcards(state: &AppState, user: &User, keyword: &str) -> AppResult<Vec<FlashcardView>> {
    Ok(state.flashcards.search(user.id, keyword).await?)
}

pub async fn create_flashcard(
    state: &AppState,
    user: &User,
    question: &str,
    answer: &str,
    category_id: i64,
) -> AppResult<FlashcardView> {
    owned_category(state, user.id, category_id, "use this category").await?;

    let card = state
        .flashcards
        .create(user.id, question, answer, category_id)
        .await?;
    info!(user_id = user.id, flashcard_id = card.id, category_id, "flashcard created");
    Ok(card)
}

pub async fn update_flashcard(
    state: &AppState,
    user: &User,
    id: i64,
    changes: FlashcardChanges,
) -> AppResult<FlashcardView> {
    owned_flashcard(state, user.id, id, "update this flashcard").await?;
    if let Some(category_id) = changes.category_id {
        owned_category(state, user.id, category_id, "use this category").await?;
    }

    let card = state
        .flashcards
        .update(id, &changes)
        .await?
        .ok_or(AppError::NotFound("FlashCard"))?;
    info!(user_id = user.id, flashcard_id = id, "flashcard updated");
    Ok(card)
}

pub async fn delete_flashcard(state: &AppState, user: &User, id: i64) -> AppResult<()> {
    owned_flashcard(state, user.id, id, "delete this flashcard").await?;

    if !state.flashcards.delete(id).await? {
        return Err(AppError::NotFound("FlashCard"));
    }
    info!(user_id = user.id, flashcard_id = id, "flashcard deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::services::register, categories::services::create_category};

    struct Fixture {
        state: AppState,
        a: User,
        b: User,
        a_cat: i64,
        b_cat: i64,
    }

    async fn fixture() -> Fixture {
        let state = AppState::fake();
        let a = register(&state, "a@x.com", "pw1").await.unwrap();
        let b = register(&state, "b@x.com", "pw2").await.unwrap();
        let a_cat = create_category(&state, &a, "Py").await.unwrap().id;
        let b_cat = create_category(&state, &b, "Other").await.unwrap().id;
        Fixture { state, a, b, a_cat, b_cat }
    }

    #[tokio::test]
    async fn create_joins_category_name() {
        let f = fixture().await;
        let card = create_flashcard(&f.state, &f.a, "What is FastAPI?", "A framework", f.a_cat)
            .await
            .unwrap();
        assert_eq!(card.category_name.as_deref(), Some("Py"));
        assert_eq!(card.user_id, f.a.id);
        assert_eq!(card.created_at, card.updated_at);
    }

    #[tokio::test]
    async fn create_rejects_missing_or_foreign_category() {
        let f = fixture().await;
        let err = create_flashcard(&f.state, &f.a, "q", "a", 9999).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound("Category")));

        let err = create_flashcard(&f.state, &f.a, "q", "a", f.b_cat).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert!(list_flashcards(&f.state, &f.b, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_filters_by_category_without_ownership_check() {
        let f = fixture().await;
        let second = create_category(&f.state, &f.a, "Rust").await.unwrap().id;
        create_flashcard(&f.state, &f.a, "q1", "a1", f.a_cat).await.unwrap();
        create_flashcard(&f.state, &f.a, "q2", "a2", second).await.unwrap();
        create_flashcard(&f.state, &f.b, "q3", "a3", f.b_cat).await.unwrap();

        let all = list_flashcards(&f.state, &f.a, None).await.unwrap();
        assert_eq!(all.len(), 2);

        let py = list_flashcards(&f.state, &f.a, Some(f.a_cat)).await.unwrap();
        assert_eq!(py.len(), 1);
        assert_eq!(py[0].question, "q1");

        let foreign = list_flashcards(&f.state, &f.a, Some(f.b_cat)).await.unwrap();
        assert!(foreign.is_empty());
        let unknown = list_flashcards(&f.state, &f.a, Some(424242)).await.unwrap();
        assert!(unknown.is_empty());
    }

    #[tokio::test]
    async fn search_is_case_insensitive_and_scoped() {
        let f = fixture().await;
        create_flashcard(&f.state, &f.a, "What is FastAPI?", "A web thing", f.a_cat).await.unwrap();
        create_flashcard(&f.state, &f.a, "Why Python?", "A fast framework ecosystem", f.a_cat)
            .await
            .unwrap();
        create_flashcard(&f.state, &f.a, "Unrelated", "Nothing here", f.a_cat).await.unwrap();
        create_flashcard(&f.state, &f.b, "What is FastAPI?", "A web thing", f.b_cat).await.unwrap();

        let hits = search_flashcards(&f.state, &f.a, "fast").await.unwrap();
        let questions: Vec<_> = hits.iter().map(|c| c.question.as_str()).collect();
        assert_eq!(questions, vec!["What is FastAPI?", "Why Python?"]);
        assert!(hits.iter().all(|c| c.user_id == f.a.id));

        let everything = search_flashcards(&f.state, &f.a, "").await.unwrap();
        assert_eq!(everything.len(), 3);
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let f = fixture().await;
        create_flashcard(&f.state, &f.a, "100% sure?", "yes", f.a_cat).await.unwrap();
        create_flashcard(&f.state, &f.a, "1000 things", "no", f.a_cat).await.unwrap();

        let hits = search_flashcards(&f.state, &f.a, "0%").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].question, "100% sure?");
    }

    #[tokio::test]
    async fn update_is_partial_and_ownership_checked() {
        let f = fixture().await;
        let second = create_category(&f.state, &f.a, "Rust").await.unwrap().id;
        let card = create_flashcard(&f.state, &f.a, "q", "a", f.a_cat).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        let changes = FlashcardChanges {
            answer: Some("better".into()),
            ..Default::default()
        };
        let updated = update_flashcard(&f.state, &f.a, card.id, changes).await.unwrap();
        assert_eq!(updated.question, "q");
        assert_eq!(updated.answer, "better");
        assert_eq!(updated.category_id, f.a_cat);
        assert!(updated.updated_at > card.updated_at);
        assert_eq!(updated.created_at, card.created_at);

        let moved = FlashcardChanges {
            category_id: Some(second),
            ..Default::default()
        };
        let updated = update_flashcard(&f.state, &f.a, card.id, moved).await.unwrap();
        assert_eq!(updated.category_id, second);
        assert_eq!(updated.category_name.as_deref(), Some("Rust"));

        let err = update_flashcard(&f.state, &f.b, card.id, FlashcardChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let err = update_flashcard(&f.state, &f.a, 9999, FlashcardChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound("FlashCard")));
    }

    #[tokio::test]
    async fn empty_update_keeps_updated_at() {
        let f = fixture().await;
        let card = create_flashcard(&f.state, &f.a, "q", "a", f.a_cat).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        let same = update_flashcard(&f.state, &f.a, card.id, FlashcardChanges::default())
            .await
            .unwrap();
        assert_eq!(same.updated_at, card.updated_at);
        assert_eq!(same.question, "q");
        assert_eq!(same.answer, "a");
    }

    #[tokio::test]
    async fn update_rejects_repointing_to_foreign_category() {
        let f = fixture().await;
        let card = create_flashcard(&f.state, &f.a, "q", "a", f.a_cat).await.unwrap();

        let steal = FlashcardChanges {
            question: Some("changed".into()),
            category_id: Some(f.b_cat),
            ..Default::default()
        };
        let err = update_flashcard(&f.state, &f.a, card.id, steal).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let missing = FlashcardChanges {
            category_id: Some(9999),
            ..Default::default()
        };
        let err = update_flashcard(&f.state, &f.a, card.id, missing).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound("Category")));

        let stored = f.state.flashcards.find(card.id).await.unwrap().unwrap();
        assert_eq!(stored.question, "q");
        assert_eq!(stored.category_id, f.a_cat);
    }

    #[tokio::test]
    async fn delete_requires_ownership() {
        let f = fixture().await;
        let card = create_flashcard(&f.state, &f.a, "q", "a", f.a_cat).await.unwrap();

        let err = delete_flashcard(&f.state, &f.b, card.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        delete_flashcard(&f.state, &f.a, card.id).await.unwrap();
        let err = delete_flashcard(&f.state, &f.a, card.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn deleting_user_removes_everything_it_owns() {
        let f = fixture().await;
        create_flashcard(&f.state, &f.a, "q", "a", f.a_cat).await.unwrap();
        create_flashcard(&f.state, &f.b, "q", "a", f.b_cat).await.unwrap();

        crate::auth::services::delete_account(&f.state, &f.a).await.unwrap();

        assert!(f.state.categories.list_with_counts(f.a.id).await.unwrap().is_empty());
        assert!(f.state.flashcards.list(f.a.id, None).await.unwrap().is_empty());
        assert!(f.state.categories.find(f.a_cat).await.unwrap().is_none());
        assert_eq!(f.state.flashcards.list(f.b.id, None).await.unwrap().len(), 1);
    }
}
