// /catalog/categories/ - CRUD over the top of the content hierarchy.
// Representations embed book previews with chapter counts; deleting a
// category cascades to its books and chapters at the database layer.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::api::format::category_json;
use crate::database::models::catalog::{BookPreview, Category};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// GET /catalog/categories/ - List categories with their book previews.
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let categories: Vec<Category> = sqlx::query_as("SELECT * FROM categories ORDER BY created_at")
        .fetch_all(&state.pool)
        .await?;
    let previews = book_previews(&state).await?;

    let body = categories
        .iter()
        .map(|category| {
            let books: Vec<&BookPreview> = previews
                .iter()
                .filter(|b| b.category_id == category.id)
                .collect();
            category_json(category, &books)
        })
        .collect::<Vec<_>>();

    Ok(Json(Value::Array(body)))
}

/// POST /catalog/categories/ - Create a category.
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CategoryPayload>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let category: Category = sqlx::query_as(
        "INSERT INTO categories (id, name, description) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(&payload.name)
    .bind(&payload.description)
    .fetch_one(&state.pool)
    .await?;

    Ok((StatusCode::CREATED, Json(category_json(&category, &[]))))
}

/// GET /catalog/categories/{id} - Retrieve one category.
pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let category = fetch_category(&state, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Not found."))?;
    let previews = book_previews(&state).await?;
    let books: Vec<&BookPreview> = previews.iter().filter(|b| b.category_id == id).collect();

    Ok(Json(category_json(&category, &books)))
}

/// PUT /catalog/categories/{id} - Replace name and description.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryPayload>,
) -> Result<Json<Value>, ApiError> {
    let category: Option<Category> = sqlx::query_as(
        "UPDATE categories SET name = $2, description = $3, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&payload.name)
    .bind(&payload.description)
    .fetch_optional(&state.pool)
    .await?;

    respond_with_books(&state, category).await
}

/// PATCH /catalog/categories/{id} - Update provided fields only.
pub async fn partial_update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryPatch>,
) -> Result<Json<Value>, ApiError> {
    let category: Option<Category> = sqlx::query_as(
        r#"
        UPDATE categories
        SET name = COALESCE($2, name),
            description = COALESCE($3, description),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(payload.name)
    .bind(payload.description)
    .fetch_optional(&state.pool)
    .await?;

    respond_with_books(&state, category).await
}

/// DELETE /catalog/categories/{id} - Remove the category and, via cascade,
/// everything under it.
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() > 0 {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Not found."))
    }
}

async fn fetch_category(state: &AppState, id: Uuid) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await
}

async fn book_previews(state: &AppState) -> Result<Vec<BookPreview>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT b.id, b.category_id, b.title, COUNT(c.id) AS chapters_number
        FROM books b
        LEFT JOIN chapters c ON c.book_id = b.id
        GROUP BY b.id
        ORDER BY b.number
        "#,
    )
    .fetch_all(&state.pool)
    .await
}

async fn respond_with_books(
    state: &AppState,
    category: Option<Category>,
) -> Result<Json<Value>, ApiError> {
    let category = category.ok_or_else(|| ApiError::not_found("Not found."))?;
    let previews = book_previews(state).await?;
    let books: Vec<&BookPreview> = previews
        .iter()
        .filter(|b| b.category_id == category.id)
        .collect();

    Ok(Json(category_json(&category, &books)))
}
