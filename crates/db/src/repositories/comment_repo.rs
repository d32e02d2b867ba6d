//! Repository for the `comments` table.

use booklog_core::types::{new_id, DbId};
use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::comment::{Comment, CreateComment};

const COLUMNS: &str = "id, book_id, text, created_at, updated_at";

/// Provides CRUD operations for book comments.
pub struct CommentRepo;

impl CommentRepo {
    pub async fn create(pool: &SqlitePool, input: &CreateComment) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (id, book_id, text, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(new_id())
            .bind(input.book_id)
            .bind(&input.text)
            .bind(Utc::now())
            .fetch_one(pool)
            .await
    }

    /// Comments of a book, oldest first.
    pub async fn list_by_book(
        pool: &SqlitePool,
        book_id: DbId,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM comments WHERE book_id = ?1 ORDER BY created_at");
        sqlx::query_as::<_, Comment>(&query)
            .bind(book_id)
            .fetch_all(pool)
            .await
    }

    /// Replace a comment's text. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        text: &str,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "UPDATE comments SET text = ?2, updated_at = ?3 WHERE id = ?1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(text)
            .bind(Utc::now())
            .fetch_optional(pool)
            .await
    }

    /// Returns the commented book's id, or `None` if no row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar("DELETE FROM comments WHERE id = ?1 RETURNING book_id")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
