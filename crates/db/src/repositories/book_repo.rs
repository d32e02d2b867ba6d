//! Repository for the `books` and `book_tags` tables.

use booklog_core::progress::ReadProgress;
use booklog_core::reorder::{next_priority, MoveRequest};
use booklog_core::types::{new_id, DbId, Timestamp};
use chrono::Utc;
use sqlx::types::Json;
use sqlx::{SqliteConnection, SqlitePool};

use crate::models::book::{Book, CreateBook, UpdateBook};
use crate::models::tag::Tag;
use crate::repositories::order_repo::{MoveOutcome, OrderRepo, OrderedKind};
use crate::repositories::tag_repo;

/// Column list for books queries.
const COLUMNS: &str = "id, status_id, title, priority, authors, publisher, published_date, \
    description, small_thumbnail, thumbnail, cover_image, current_page, total_page, deadline, \
    created_at, updated_at";

/// Provides CRUD, ordering and tagging operations for books.
pub struct BookRepo;

impl BookRepo {
    /// Append a book after the existing books of its status.
    pub async fn create(pool: &SqlitePool, input: &CreateBook) -> Result<Book, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let priority =
            next_priority(OrderRepo::count(&mut tx, OrderedKind::Book, input.status_id).await?);

        let query = format!(
            "INSERT INTO books
                (id, status_id, title, priority, authors, publisher, published_date,
                 description, small_thumbnail, thumbnail, cover_image, current_page,
                 total_page, deadline, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?15)
             RETURNING {COLUMNS}"
        );
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(new_id())
            .bind(input.status_id)
            .bind(&input.title)
            .bind(priority)
            .bind(Json(&input.authors))
            .bind(&input.publisher)
            .bind(&input.published_date)
            .bind(&input.description)
            .bind(&input.small_thumbnail)
            .bind(&input.thumbnail)
            .bind(&input.cover_image)
            .bind(input.progress.map(|p| p.current_page))
            .bind(input.progress.map(|p| p.total_page))
            .bind(input.deadline)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(book_id = %book.id, status_id = %book.status_id, priority, "Created book");
        Ok(book)
    }

    /// Find a book by its ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Book>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM books WHERE id = ?1");
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the books of a status in priority order.
    pub async fn list_by_status(
        pool: &SqlitePool,
        status_id: DbId,
    ) -> Result<Vec<Book>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM books WHERE status_id = ?1 ORDER BY priority");
        sqlx::query_as::<_, Book>(&query)
            .bind(status_id)
            .fetch_all(pool)
            .await
    }

    /// Books whose deadline is before `before`, soonest first.
    pub async fn list_due_before(
        pool: &SqlitePool,
        before: Timestamp,
    ) -> Result<Vec<Book>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM books
             WHERE deadline IS NOT NULL AND deadline < ?1
             ORDER BY deadline"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(before)
            .fetch_all(pool)
            .await
    }

    /// Update a book. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateBook,
    ) -> Result<Option<Book>, sqlx::Error> {
        let query = format!(
            "UPDATE books SET
                title = COALESCE(?2, title),
                authors = COALESCE(?3, authors),
                publisher = COALESCE(?4, publisher),
                published_date = COALESCE(?5, published_date),
                description = COALESCE(?6, description),
                small_thumbnail = COALESCE(?7, small_thumbnail),
                thumbnail = COALESCE(?8, thumbnail),
                cover_image = COALESCE(?9, cover_image),
                updated_at = ?10
             WHERE id = ?1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.authors.as_ref().map(Json))
            .bind(&input.publisher)
            .bind(&input.published_date)
            .bind(&input.description)
            .bind(&input.small_thumbnail)
            .bind(&input.thumbnail)
            .bind(&input.cover_image)
            .bind(Utc::now())
            .fetch_optional(pool)
            .await
    }

    /// Set or clear reading progress.
    pub async fn set_progress(
        pool: &SqlitePool,
        id: DbId,
        progress: Option<ReadProgress>,
    ) -> Result<Option<Book>, sqlx::Error> {
        let query = format!(
            "UPDATE books SET current_page = ?2, total_page = ?3, updated_at = ?4
             WHERE id = ?1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .bind(progress.map(|p| p.current_page))
            .bind(progress.map(|p| p.total_page))
            .bind(Utc::now())
            .fetch_optional(pool)
            .await
    }

    /// Set or clear the deadline.
    pub async fn set_deadline(
        pool: &SqlitePool,
        id: DbId,
        deadline: Option<Timestamp>,
    ) -> Result<Option<Book>, sqlx::Error> {
        let query = format!(
            "UPDATE books SET deadline = ?2, updated_at = ?3
             WHERE id = ?1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .bind(deadline)
            .bind(Utc::now())
            .fetch_optional(pool)
            .await
    }

    /// Delete a book with its comments and tag links, then renumber the
    /// remaining books of its status. Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let status_id: Option<DbId> =
            sqlx::query_scalar("SELECT status_id FROM books WHERE id = ?1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(status_id) = status_id else {
            return Ok(false);
        };

        Self::delete_dependents(&mut tx, "book_id = ?1", id).await?;
        sqlx::query("DELETE FROM books WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        OrderRepo::renumber(&mut tx, OrderedKind::Book, status_id).await?;
        tx.commit().await?;

        tracing::info!(book_id = %id, status_id = %status_id, "Deleted book");
        Ok(true)
    }

    /// Delete every book of a status. Returns the number of books removed.
    pub async fn delete_all_in_status(
        pool: &SqlitePool,
        status_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        Self::delete_dependents(
            &mut tx,
            "book_id IN (SELECT id FROM books WHERE status_id = ?1)",
            status_id,
        )
        .await?;
        let result = sqlx::query("DELETE FROM books WHERE status_id = ?1")
            .bind(status_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(status_id = %status_id, removed = result.rows_affected(), "Emptied status");
        Ok(result.rows_affected())
    }

    /// Move a book within its status or to another status.
    pub async fn move_book(
        pool: &SqlitePool,
        request: &MoveRequest<DbId>,
    ) -> Result<MoveOutcome, sqlx::Error> {
        OrderRepo::move_item(pool, OrderedKind::Book, request).await
    }

    // -----------------------------------------------------------------------
    // Tag association helpers
    // -----------------------------------------------------------------------

    /// Tags attached to a book, by name.
    pub async fn tags_for_book(pool: &SqlitePool, book_id: DbId) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM tags t
             JOIN book_tags bt ON bt.tag_id = t.id
             WHERE bt.book_id = ?1
             ORDER BY t.name",
            tag_repo::PREFIXED_COLUMNS
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(book_id)
            .fetch_all(pool)
            .await
    }

    /// Attach a tag to a book (idempotent). Returns `true` if the link is new.
    pub async fn add_tag(
        pool: &SqlitePool,
        book_id: DbId,
        tag_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO book_tags (book_id, tag_id, created_at) VALUES (?1, ?2, ?3)
             ON CONFLICT DO NOTHING",
        )
        .bind(book_id)
        .bind(tag_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;
        let added = result.rows_affected() > 0;
        if added {
            Self::touch(&mut tx, book_id).await?;
        }
        tx.commit().await?;
        Ok(added)
    }

    /// Detach a tag from a book. Returns `true` if the link existed.
    pub async fn remove_tag(
        pool: &SqlitePool,
        book_id: DbId,
        tag_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let result = sqlx::query("DELETE FROM book_tags WHERE book_id = ?1 AND tag_id = ?2")
            .bind(book_id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await?;
        let removed = result.rows_affected() > 0;
        if removed {
            Self::touch(&mut tx, book_id).await?;
        }
        tx.commit().await?;
        Ok(removed)
    }

    /// Attach the tag if missing, detach it otherwise. Returns `true` when
    /// the tag is attached afterwards.
    pub async fn toggle_tag(
        pool: &SqlitePool,
        book_id: DbId,
        tag_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        if Self::remove_tag(pool, book_id, tag_id).await? {
            return Ok(false);
        }
        Self::add_tag(pool, book_id, tag_id).await
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    async fn touch(conn: &mut SqliteConnection, book_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE books SET updated_at = ?1 WHERE id = ?2")
            .bind(Utc::now())
            .bind(book_id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    /// Remove comments and tag links of the books matched by `book_filter`,
    /// a predicate over `book_id` with one `?1` parameter.
    async fn delete_dependents(
        conn: &mut SqliteConnection,
        book_filter: &str,
        param: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(&format!("DELETE FROM comments WHERE {book_filter}"))
            .bind(param)
            .execute(&mut *conn)
            .await?;
        sqlx::query(&format!("DELETE FROM book_tags WHERE {book_filter}"))
            .bind(param)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}
