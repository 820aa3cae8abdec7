// /catalog/books/ - CRUD over books. A book belongs to a category (the
// foreign key is validated by Postgres) and embeds chapter previews.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::api::format::book_json;
use crate::database::{self, models::catalog::{Book, ChapterPreview}};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BookPayload {
    pub category: Uuid,
    pub number: i32,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct BookPatch {
    pub category: Option<Uuid>,
    pub number: Option<i32>,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// GET /catalog/books/ - List books with chapter previews.
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let books: Vec<Book> = sqlx::query_as("SELECT * FROM books ORDER BY number")
        .fetch_all(&state.pool)
        .await?;
    let previews = chapter_previews(&state).await?;

    let body = books
        .iter()
        .map(|book| {
            let chapters: Vec<&ChapterPreview> =
                previews.iter().filter(|c| c.book_id == book.id).collect();
            book_json(book, &chapters)
        })
        .collect::<Vec<_>>();

    Ok(Json(Value::Array(body)))
}

/// POST /catalog/books/ - Create a book under a category.
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<BookPayload>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let book: Book = sqlx::query_as(
        r#"
        INSERT INTO books (id, category_id, number, title, description)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.category)
    .bind(payload.number)
    .bind(&payload.title)
    .bind(&payload.description)
    .fetch_one(&state.pool)
    .await
    .map_err(invalid_category)?;

    Ok((StatusCode::CREATED, Json(book_json(&book, &[]))))
}

/// GET /catalog/books/{id} - Retrieve one book.
pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let book: Option<Book> = sqlx::query_as("SELECT * FROM books WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;

    respond_with_chapters(&state, book).await
}

/// PUT /catalog/books/{id} - Replace all writable fields.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BookPayload>,
) -> Result<Json<Value>, ApiError> {
    let book: Option<Book> = sqlx::query_as(
        r#"
        UPDATE books
        SET category_id = $2, number = $3, title = $4, description = $5, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(payload.category)
    .bind(payload.number)
    .bind(&payload.title)
    .bind(&payload.description)
    .fetch_optional(&state.pool)
    .await
    .map_err(invalid_category)?;

    respond_with_chapters(&state, book).await
}

/// PATCH /catalog/books/{id} - Update provided fields only.
pub async fn partial_update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BookPatch>,
) -> Result<Json<Value>, ApiError> {
    let book: Option<Book> = sqlx::query_as(
        r#"
        UPDATE books
        SET category_id = COALESCE($2, category_id),
            number = COALESCE($3, number),
            title = COALESCE($4, title),
            description = COALESCE($5, description),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(payload.category)
    .bind(payload.number)
    .bind(payload.title)
    .bind(payload.description)
    .fetch_optional(&state.pool)
    .await
    .map_err(invalid_category)?;

    respond_with_chapters(&state, book).await
}

/// DELETE /catalog/books/{id} - Remove the book and its chapters.
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let result = sqlx::query("DELETE FROM books WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() > 0 {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Not found."))
    }
}

fn invalid_category(err: sqlx::Error) -> ApiError {
    if database::is_foreign_key_violation(&err) {
        ApiError::bad_request("Invalid category.")
    } else {
        err.into()
    }
}

async fn chapter_previews(state: &AppState) -> Result<Vec<ChapterPreview>, sqlx::Error> {
    sqlx::query_as("SELECT id, book_id, title FROM chapters ORDER BY number")
        .fetch_all(&state.pool)
        .await
}

async fn respond_with_chapters(state: &AppState, book: Option<Book>) -> Result<Json<Value>, ApiError> {
    let book = book.ok_or_else(|| ApiError::not_found("Not found."))?;
    let previews = chapter_previews(state).await?;
    let chapters: Vec<&ChapterPreview> = previews.iter().filter(|c| c.book_id == book.id).collect();

    Ok(Json(book_json(&book, &chapters)))
}
