// /catalog/chapters/ - CRUD over chapters. The content document (an
// arbitrary JSON payload) is write-in/detail-out: list responses omit it.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::api::format::{chapter_detail_json, chapter_summary_json};
use crate::database::{self, models::catalog::Chapter};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChapterPayload {
    pub book: Uuid,
    pub number: i32,
    pub title: String,
    pub description: String,
    pub content: Value,
}

#[derive(Debug, Deserialize)]
pub struct ChapterPatch {
    pub book: Option<Uuid>,
    pub number: Option<i32>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<Value>,
}

/// GET /catalog/chapters/ - List chapters without their content documents.
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let chapters: Vec<Chapter> = sqlx::query_as("SELECT * FROM chapters ORDER BY number")
        .fetch_all(&state.pool)
        .await?;

    let body = chapters.iter().map(chapter_summary_json).collect::<Vec<_>>();
    Ok(Json(Value::Array(body)))
}

/// POST /catalog/chapters/ - Create a chapter under a book.
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ChapterPayload>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let chapter: Chapter = sqlx::query_as(
        r#"
        INSERT INTO chapters (id, book_id, number, title, description, content)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.book)
    .bind(payload.number)
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(&payload.content)
    .fetch_one(&state.pool)
    .await
    .map_err(invalid_book)?;

    Ok((StatusCode::CREATED, Json(chapter_detail_json(&chapter))))
}

/// GET /catalog/chapters/{id} - Retrieve one chapter, content included.
pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let chapter: Chapter = sqlx::query_as("SELECT * FROM chapters WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Not found."))?;

    Ok(Json(chapter_detail_json(&chapter)))
}

/// PUT /catalog/chapters/{id} - Replace all writable fields.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChapterPayload>,
) -> Result<Json<Value>, ApiError> {
    let chapter: Option<Chapter> = sqlx::query_as(
        r#"
        UPDATE chapters
        SET book_id = $2, number = $3, title = $4, description = $5, content = $6, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(payload.book)
    .bind(payload.number)
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(&payload.content)
    .fetch_optional(&state.pool)
    .await
    .map_err(invalid_book)?;

    let chapter = chapter.ok_or_else(|| ApiError::not_found("Not found."))?;
    Ok(Json(chapter_detail_json(&chapter)))
}

/// PATCH /catalog/chapters/{id} - Update provided fields only.
pub async fn partial_update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChapterPatch>,
) -> Result<Json<Value>, ApiError> {
    let chapter: Option<Chapter> = sqlx::query_as(
        r#"
        UPDATE chapters
        SET book_id = COALESCE($2, book_id),
            number = COALESCE($3, number),
            title = COALESCE($4, title),
            description = COALESCE($5, description),
            content = COALESCE($6, content),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(payload.book)
    .bind(payload.number)
    .bind(payload.title)
    .bind(payload.description)
    .bind(payload.content)
    .fetch_optional(&state.pool)
    .await
    .map_err(invalid_book)?;

    let chapter = chapter.ok_or_else(|| ApiError::not_found("Not found."))?;
    Ok(Json(chapter_detail_json(&chapter)))
}

/// DELETE /catalog/chapters/{id} - Remove the chapter.
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let result = sqlx::query("DELETE FROM chapters WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() > 0 {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Not found."))
    }
}

fn invalid_book(err: sqlx::Error) -> ApiError {
    if database::is_foreign_key_violation(&err) {
        ApiError::bad_request("Invalid book.")
    } else {
        err.into()
    }
}
