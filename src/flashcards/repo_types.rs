use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Clone, FromRow)]
pub struct Flashcard {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub user_id: i64,
    pub category_id: i64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Flashcard joined with the name of its category.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FlashcardView {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category_id: i64,
    pub category_name: Option<String>,
    pub user_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct FlashcardChanges {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category_id: Option<i64>,
}

impl FlashcardChanges {
    pub fn is_empty(&self) -> bool {
        self.question.is_none() && self.answer.is_none() && self.category_id.is_none()
    }
}

/// Turn a search keyword into an ILIKE pattern that matches it literally anywhere.
pub fn like_pattern(keyword: &str) -> String {
    let mut out = String::with_capacity(keyword.len() + 2);
    out.push('%');
    for ch in keyword.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}
