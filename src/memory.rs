use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    auth::{repo::UserRepo, repo_types::User},
    categories::{
        repo::CategoryRepo,
        repo_types::{Category, CategoryWithCount},
    },
    flashcards::{
        repo::FlashcardRepo,
        repo_types::{Flashcard, FlashcardChanges, FlashcardView},
    },
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    categories: Vec<Category>,
    flashcards: Vec<Flashcard>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn view(&self, f: &Flashcard) -> FlashcardView {
        FlashcardView {
            id: f.id,
            question: f.question.clone(),
            answer: f.answer.clone(),
            category_id: f.category_id,
            category_name: self
                .categories
                .iter()
                .find(|c| c.id == f.category_id)
                .map(|c| c.name.clone()),
            user_id: f.user_id,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }

    fn count_in(&self, category_id: i64) -> i64 {
        self.flashcards
            .iter()
            .filter(|f| f.category_id == category_id)
            .count() as i64
    }
}

/// In-process store for tests. Cascades deletes by hand.
#[derive(Default)]
pub struct MemoryRepo {
    tables: Mutex<Tables>,
}

impl MemoryRepo {
    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl UserRepo for MemoryRepo {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, email: &str, password_hash: &str) -> anyhow::Result<Option<User>> {
        let mut t = self.lock();
        if t.users.iter().any(|u| u.email == email) {
            return Ok(None);
        }
        let user = User {
            id: t.next_id(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.push(user.clone());
        Ok(Some(user))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let mut t = self.lock();
        let before = t.users.len();
        t.users.retain(|u| u.id != id);
        if t.users.len() == before {
            return Ok(false);
        }
        t.flashcards.retain(|f| f.user_id != id);
        t.categories.retain(|c| c.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl CategoryRepo for MemoryRepo {
    async fn list_with_counts(&self, user_id: i64) -> anyhow::Result<Vec<CategoryWithCount>> {
        let t = self.lock();
        Ok(t.categories
            .iter()
            .filter(|c| c.user_id == user_id)
            .map(|c| CategoryWithCount::new(c.clone(), t.count_in(c.id)))
            .collect())
    }

    async fn find(&self, id: i64) -> anyhow::Result<Option<Category>> {
        Ok(self.lock().categories.iter().find(|c| c.id == id).cloned())
    }

    async fn create(&self, user_id: i64, name: &str) -> anyhow::Result<Category> {
        let mut t = self.lock();
        let category = Category {
            id: t.next_id(),
            name: name.to_string(),
            user_id,
            created_at: OffsetDateTime::now_utc(),
        };
        t.categories.push(category.clone());
        Ok(category)
    }

    async fn rename(&self, id: i64, name: &str) -> anyhow::Result<Option<CategoryWithCount>> {
        let mut t = self.lock();
        let Some(category) = t.categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        category.name = name.to_string();
        let category = category.clone();
        let count = t.count_in(id);
        Ok(Some(CategoryWithCount::new(category, count)))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let mut t = self.lock();
        let before = t.categories.len();
        t.categories.retain(|c| c.id != id);
        if t.categories.len() == before {
            return Ok(false);
        }
        t.flashcards.retain(|f| f.category_id != id);
        Ok(true)
    }
}

#[async_trait]
impl FlashcardRepo for MemoryRepo {
    async fn list(&self, user_id: i64, category_id: Option<i64>) -> anyhow::Result<Vec<FlashcardView>> {
        let t = self.lock();
        Ok(t.flashcards
            .iter()
            .filter(|f| f.user_id == user_id)
            .filter(|f| category_id.map_or(true, |id| f.category_id == id))
            .map(|f| t.view(f))
            .collect())
    }

    async fn search(&self, user_id: i64, keyword: &str) -> anyhow::Result<Vec<FlashcardView>> {
        let needle = keyword.to_lowercase();
        let t = self.lock();
        Ok(t.flashcards
            .iter()
            .filter(|f| f.user_id == user_id)
            .filter(|f| {
                f.question.to_lowercase().contains(&needle)
                    || f.answer.to_lowercase().contains(&needle)
            })
            .map(|f| t.view(f))
            .collect())
    }

    async fn find(&self, id: i64) -> anyhow::Result<Option<Flashcard>> {
        Ok(self.lock().flashcards.iter().find(|f| f.id == id).cloned())
    }

    async fn create(
        &self,
        user_id: i64,
        question: &str,
        answer: &str,
        category_id: i64,
    ) -> anyhow::Result<FlashcardView> {
        let mut t = self.lock();
        if !t.categories.iter().any(|c| c.id == category_id) {
            anyhow::bail!("foreign key violation: category {category_id} does not exist");
        }
        let now = OffsetDateTime::now_utc();
        let card = Flashcard {
            id: t.next_id(),
            question: question.to_string(),
            answer: answer.to_string(),
            user_id,
            category_id,
            created_at: now,
            updated_at: now,
        };
        let view = t.view(&card);
        t.flashcards.push(card);
        Ok(view)
    }

    async fn update(&self, id: i64, changes: &FlashcardChanges) -> anyhow::Result<Option<FlashcardView>> {
        let mut t = self.lock();
        let Some(card) = t.flashcards.iter_mut().find(|f| f.id == id) else {
            return Ok(None);
        };
        if let Some(q) = &changes.question {
            card.question = q.clone();
        }
        if let Some(a) = &changes.answer {
            card.answer = a.clone();
        }
        if let Some(c) = changes.category_id {
            card.category_id = c;
        }
        if !changes.is_empty() {
            card.updated_at = OffsetDateTime::now_utc();
        }
        let card = card.clone();
        Ok(Some(t.view(&card)))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let mut t = self.lock();
        let before = t.flashcards.len();
        t.flashcards.retain(|f| f.id != id);
        Ok(t.flashcards.len() != before)
    }
}
