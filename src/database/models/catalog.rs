use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: Uuid,
    pub category_id: Uuid,
    pub number: i32,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Chapter content is an arbitrary JSON document (headings, paragraphs, ...);
/// the API hides it from list views and exposes it on detail views.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Chapter {
    pub id: Uuid,
    pub book_id: Uuid,
    pub number: i32,
    pub title: String,
    pub description: String,
    pub content: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Book row joined with its chapter count, for category previews.
#[derive(Debug, Clone, FromRow)]
pub struct BookPreview {
    pub id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub chapters_number: i64,
}

/// Chapter id/title pair, for book previews.
#[derive(Debug, Clone, FromRow)]
pub struct ChapterPreview {
    pub id: Uuid,
    pub book_id: Uuid,
    pub title: String,
}
