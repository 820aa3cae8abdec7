pub mod books;
pub mod categories;
pub mod chapters;

use axum::response::Json;
use serde_json::{json, Value};

/// GET /catalog/ - Catalog API index.
pub async fn api_root() -> Json<Value> {
    Json(json!({
        "categories": "/catalog/categories/",
        "books": "/catalog/books/",
        "chapters": "/catalog/chapters/",
    }))
}
