//! Wire-format builders: model rows -> public JSON shapes. List views embed
//! lightweight previews of children; the password hash never leaves here.

use serde_json::{json, Value};

use crate::database::models::catalog::{Book, BookPreview, Category, Chapter, ChapterPreview};
use crate::database::models::Account;

pub fn account_json(account: &Account) -> Value {
    json!({
        "id": account.id,
        "username": account.username,
        "email": account.email,
        "first_name": account.first_name,
        "last_name": account.last_name,
    })
}

/// Admin-facing account row; includes the flags but still not the hash.
pub fn account_admin_json(account: &Account) -> Value {
    json!({
        "id": account.id,
        "username": account.username,
        "email": account.email,
        "first_name": account.first_name,
        "last_name": account.last_name,
        "is_active": account.is_active,
        "email_verified": account.email_verified,
        "created_at": account.created_at,
    })
}

pub fn category_json(category: &Category, books: &[&BookPreview]) -> Value {
    json!({
        "id": category.id,
        "name": category.name,
        "description": category.description,
        "books": books.iter().map(|b| book_preview_json(b)).collect::<Vec<_>>(),
    })
}

fn book_preview_json(book: &BookPreview) -> Value {
    json!({
        "id": book.id,
        "title": book.title,
        "chapters_number": book.chapters_number,
    })
}

pub fn book_json(book: &Book, chapters: &[&ChapterPreview]) -> Value {
    json!({
        "id": book.id,
        "category": book.category_id,
        "number": book.number,
        "title": book.title,
        "description": book.description,
        "chapters": chapters.iter().map(|c| chapter_preview_json(c)).collect::<Vec<_>>(),
    })
}

fn chapter_preview_json(chapter: &ChapterPreview) -> Value {
    json!({
        "id": chapter.id,
        "title": chapter.title,
    })
}

/// List shape: the content document stays out of collection responses.
pub fn chapter_summary_json(chapter: &Chapter) -> Value {
    json!({
        "id": chapter.id,
        "book": chapter.book_id,
        "number": chapter.number,
        "title": chapter.title,
        "description": chapter.description,
    })
}

pub fn chapter_detail_json(chapter: &Chapter) -> Value {
    json!({
        "id": chapter.id,
        "book": chapter.book_id,
        "number": chapter.number,
        "title": chapter.title,
        "description": chapter.description,
        "content": chapter.content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn chapter() -> Chapter {
        Chapter {
            id: Uuid::new_v4(),
            book_id: Uuid::new_v4(),
            number: 1,
            title: "IP Addresses".to_string(),
            description: "Learn about IP Addresses.".to_string(),
            content: json!({"h1": "IP Addresses"}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_chapter_summary_hides_content() {
        let value = chapter_summary_json(&chapter());
        assert!(value.get("content").is_none());
        assert_eq!(value["title"], "IP Addresses");
    }

    #[test]
    fn test_chapter_detail_includes_content() {
        let value = chapter_detail_json(&chapter());
        assert_eq!(value["content"]["h1"], "IP Addresses");
    }

    #[test]
    fn test_account_json_never_exposes_password_hash() {
        let account = Account {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@test.com".to_string(),
            password_hash: "argon2id$secret".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            is_active: true,
            email_verified: false,
            verification_token: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        for value in [account_json(&account), account_admin_json(&account)] {
            assert!(value.get("password_hash").is_none());
            assert!(value.get("password").is_none());
        }
    }
}
