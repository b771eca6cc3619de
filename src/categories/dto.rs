use serde::Deserialize;

/// `POST /categories`
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

/// `PUT /categories/{id}`
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: String,
}
