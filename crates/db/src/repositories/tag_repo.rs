//! Repository for the `tags` table.

use booklog_core::color::random_hex;
use booklog_core::types::{new_id, DbId};
use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::book::Book;
use crate::models::tag::{CreateTag, Tag, UpdateTag};

/// Column list for tags queries.
const COLUMNS: &str = "id, name, color, created_at, updated_at";

/// Column list for the `tags` table aliased as `t` (used in JOIN queries).
pub(crate) const PREFIXED_COLUMNS: &str = "t.id, t.name, t.color, t.created_at, t.updated_at";

/// Provides CRUD operations for tags.
pub struct TagRepo;

impl TagRepo {
    /// Insert a new tag. Picks a random colour if none is given.
    pub async fn create(pool: &SqlitePool, input: &CreateTag) -> Result<Tag, sqlx::Error> {
        let color = input.color.clone().unwrap_or_else(random_hex);
        let query = format!(
            "INSERT INTO tags (id, name, color, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(new_id())
            .bind(&input.name)
            .bind(color)
            .bind(Utc::now())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags WHERE id = ?1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags WHERE name = ?1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List all tags ordered by name.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags ORDER BY name");
        sqlx::query_as::<_, Tag>(&query).fetch_all(pool).await
    }

    /// Update a tag. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateTag,
    ) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!(
            "UPDATE tags SET
                name = COALESCE(?2, name),
                color = COALESCE(?3, color),
                updated_at = ?4
             WHERE id = ?1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.color)
            .bind(Utc::now())
            .fetch_optional(pool)
            .await
    }

    /// Delete a tag and its book links. Books are left untouched.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM book_tags WHERE tag_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM tags WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Books carrying a tag, most recently updated first.
    pub async fn books_for_tag(pool: &SqlitePool, tag_id: DbId) -> Result<Vec<Book>, sqlx::Error> {
        sqlx::query_as::<_, Book>(
            "SELECT b.* FROM books b
             JOIN book_tags bt ON bt.book_id = b.id
             WHERE bt.tag_id = ?1
             ORDER BY b.updated_at DESC",
        )
        .bind(tag_id)
        .fetch_all(pool)
        .await
    }
}
