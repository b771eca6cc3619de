use serde::Deserialize;

use super::repo_types::FlashcardChanges;

#[derive(Debug, Deserialize)]
pub struct CreateFlashcardRequest {
    pub question: String,
    pub answer: String,
    pub category_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFlashcardRequest {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category_id: Option<i64>,
}

impl From<UpdateFlashcardRequest> for FlashcardChanges {
    fn from(r: UpdateFlashcardRequest) -> Self {
        Self {
            question: r.question,
            answer: r.answer,
            category_id: r.category_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}
