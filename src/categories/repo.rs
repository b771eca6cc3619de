use anyhow::Context;
use async_trait::async_trait;

use crate::{
    categories::repo_types::{Category, CategoryWithCount},
    db::PgRepo,
};

#[async_trait]
pub trait CategoryRepo: Send + Sync {
    /// Categories owned by `user_id` with their flashcard counts, oldest first.
    async fn list_with_counts(&self, user_id: i64) -> anyhow::Result<Vec<CategoryWithCount>>;

    /// Unscoped lookup; callers check ownership.
    async fn find(&self, id: i64) -> anyhow::Result<Option<Category>>;

    async fn create(&self, user_id: i64, name: &str) -> anyhow::Result<Category>;

    /// Rename and recount. `None` if the category vanished in the meantime.
    async fn rename(&self, id: i64, name: &str) -> anyhow::Result<Option<CategoryWithCount>>;

    /// Delete the category and its flashcards.
    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
}

#[async_trait]
impl CategoryRepo for PgRepo {
    async fn list_with_counts(&self, user_id: i64) -> anyhow::Result<Vec<CategoryWithCount>> {
        let rows = sqlx::query_as::<_, CategoryWithCount>(
            r#"
            SELECT c.id, c.name, c.user_id, c.created_at,
                   COUNT(f.id) AS flashcard_count
              FROM categories c
              LEFT JOIN flashcards f ON f.category_id = c.id
             WHERE c.user_id = $1
             GROUP BY c.id
             ORDER BY c.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list categories")?;
        Ok(rows)
    }

    async fn find(&self, id: i64) -> anyhow::Result<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(
            r#"SELECT id, name, user_id, created_at FROM categories WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find category")?;
        Ok(row)
    }

    async fn create(&self, user_id: i64, name: &str) -> anyhow::Result<Category> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, user_id)
            VALUES ($1, $2)
            RETURNING id, name, user_id, created_at
            "#,
        )
        .bind(name)
        .bind(user_id)
        .fetch_one(&self.db)
        .await
        .context("insert category")?;
        Ok(row)
    }

    async fn rename(&self, id: i64, name: &str) -> anyhow::Result<Option<CategoryWithCount>> {
        let mut tx = self.db.begin().await.context("begin tx")?;

        let Some(category) = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories SET name = $2
             WHERE id = $1
            RETURNING id, name, user_id, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&mut *tx)
        .await
        .context("rename category")?
        else {
            return Ok(None);
        };

        let (count,): (i64,) =
            sqlx::query_as(r#"SELECT COUNT(*) FROM flashcards WHERE category_id = $1"#)
                .bind(id)
                .fetch_one(&mut *tx)
                .await
                .context("count flashcards")?;

        tx.commit().await.context("commit tx")?;
        Ok(Some(CategoryWithCount::new(category, count)))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        // flashcards are removed by ON DELETE CASCADE
        let res = sqlx::query(r#"DELETE FROM categories WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete category")?;
        Ok(res.rows_affected() > 0)
    }
}
