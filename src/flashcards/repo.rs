use anyhow::Context;
use async_trait::async_trait;

use crate::{
    db::PgRepo,
    flashcards::repo_types::{like_pattern, Flashcard, FlashcardChanges, FlashcardView},
};

#[async_trait]
pub trait FlashcardRepo: Send + Sync {
    /// Flashcards owned by `user_id`, optionally restricted to one category.
    async fn list(&self, user_id: i64, category_id: Option<i64>) -> anyhow::Result<Vec<FlashcardView>>;

    /// Case-insensitive substring search over question and answer.
    async fn search(&self, user_id: i64, keyword: &str) -> anyhow::Result<Vec<FlashcardView>>;

    /// Unscoped lookup; callers check ownership.
    async fn find(&self, id: i64) -> anyhow::Result<Option<Flashcard>>;

    async fn create(
        &self,
        user_id: i64,
        question: &str,
        answer: &str,
        category_id: i64,
    ) -> anyhow::Result<FlashcardView>;

    /// Apply `changes`, bumping `updated_at` unless `changes` is empty.
    /// `None` if the flashcard vanished.
    async fn update(&self, id: i64, changes: &FlashcardChanges) -> anyhow::Result<Option<FlashcardView>>;

    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
}

#[async_trait]
impl FlashcardRepo for PgRepo {
    async fn list(&self, user_id: i64, category_id: Option<i64>) -> anyhow::Result<Vec<FlashcardView>> {
        let rows = sqlx::query_as::<_, FlashcardView>(
            r#"
            SELECT f.id, f.question, f.answer, f.category_id, c.name AS category_name,
                   f.user_id, f.created_at, f.updated_at
              FROM flashcards f
              LEFT JOIN categories c ON c.id = f.category_id
             WHERE f.user_id = $1
               AND ($2::BIGINT IS NULL OR f.category_id = $2)
             ORDER BY f.id ASC
            "#,
        )
        .bind(user_id)
        .bind(category_id)
        .fetch_all(&self.db)
        .await
        .context("list flashcards")?;
        Ok(rows)
    }

    async fn search(&self, user_id: i64, keyword: &str) -> anyhow::Result<Vec<FlashcardView>> {
        let rows = sqlx::query_as::<_, FlashcardView>(
            r#"
            SELECT f.id, f.question, f.answer, f.category_id, c.name AS category_name,
                   f.user_id, f.created_at, f.updated_at
              FROM flashcards f
              LEFT JOIN categories c ON c.id = f.category_id
             WHERE f.user_id = $1
               AND (f.question ILIKE $2 OR f.answer ILIKE $2)
             ORDER BY f.id ASC
            "#,
        )
        .bind(user_id)
        .bind(like_pattern(keyword))
        .fetch_all(&self.db)
        .await
        .context("search flashcards")?;
        Ok(rows)
    }

    async fn find(&self, id: i64) -> anyhow::Result<Option<Flashcard>> {
        let row = sqlx::query_as::<_, Flashcard>(
            r#"
            SELECT id, question, answer, user_id, category_id, created_at, updated_at
              FROM flashcards
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find flashcard")?;
        Ok(row)
    }

    async fn create(
        &self,
        user_id: i64,
        question: &str,
        answer: &str,
        category_id: i64,
    ) -> anyhow::Result<FlashcardView> {
        let row = sqlx::query_as::<_, FlashcardView>(
            r#"
            WITH inserted AS (
                INSERT INTO flashcards (question, answer, user_id, category_id)
                VALUES ($1, $2, $3, $4)
                RETURNING id, question, answer, user_id, category_id, created_at, updated_at
            )
            SELECT i.id, i.question, i.answer, i.category_id, c.name AS category_name,
                   i.user_id, i.created_at, i.updated_at
              FROM inserted i
              LEFT JOIN categories c ON c.id = i.category_id
            "#,
        )
        .bind(question)
        .bind(answer)
        .bind(user_id)
        .bind(category_id)
        .fetch_one(&self.db)
        .await
        .context("insert flashcard")?;
        Ok(row)
    }

    async fn update(&self, id: i64, changes: &FlashcardChanges) -> anyhow::Result<Option<FlashcardView>> {
        let row = sqlx::query_as::<_, FlashcardView>(
            r#"
            WITH updated AS (
                UPDATE flashcards
                   SET question    = COALESCE($2, question),
                       answer      = COALESCE($3, answer),
                       category_id = COALESCE($4, category_id),
                       updated_at  = CASE WHEN $5 THEN updated_at ELSE now() END
                 WHERE id = $1
                RETURNING id, question, answer, user_id, category_id, created_at, updated_at
            )
            SELECT u.id, u.question, u.answer, u.category_id, c.name AS category_name,
                   u.user_id, u.created_at, u.updated_at
              FROM updated u
              LEFT JOIN categories c ON c.id = u.category_id
            "#,
        )
        .bind(id)
        .bind(changes.question.as_deref())
        .bind(changes.answer.as_deref())
        .bind(changes.category_id)
        .bind(changes.is_empty())
        .fetch_optional(&self.db)
        .await
        .context("update flashcard")?;
        Ok(row)
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query(r#"DELETE FROM flashcards WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete flashcard")?;
        Ok(res.rows_affected() > 0)
    }
}
