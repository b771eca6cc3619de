use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub user_id: i64,
    pub created_at: OffsetDateTime,
}

/// A category annotated with how many flashcards it holds.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CategoryWithCount {
    pub id: i64,
    pub name: String,
    pub user_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub flashcard_count: i64,
}

impl CategoryWithCount {
    pub fn new(c: Category, flashcard_count: i64) -> Self {
        Self {
            id: c.id,
            name: c.name,
            user_id: c.user_id,
            created_at: c.created_at,
            flashcard_count,
        }
    }
}
