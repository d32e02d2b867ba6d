//! Repository for the `statuses` table.

use booklog_core::reorder::{next_priority, MoveRequest};
use booklog_core::types::{new_id, DbId};
use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::status::{CreateStatus, Status, UpdateStatus};
use crate::repositories::order_repo::{MoveOutcome, OrderRepo, OrderedKind};

/// Column list for statuses queries.
pub(crate) const COLUMNS: &str = "id, board_id, title, priority, color, created_at, updated_at";

/// Provides CRUD and ordering operations for board statuses.
pub struct StatusRepo;

impl StatusRepo {
    /// Append a status after the existing statuses of its board.
    pub async fn create(pool: &SqlitePool, input: &CreateStatus) -> Result<Status, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let priority =
            next_priority(OrderRepo::count(&mut tx, OrderedKind::Status, input.board_id).await?);

        let query = format!(
            "INSERT INTO statuses (id, board_id, title, priority, color, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             RETURNING {COLUMNS}"
        );
        let status = sqlx::query_as::<_, Status>(&query)
            .bind(new_id())
            .bind(input.board_id)
            .bind(&input.title)
            .bind(priority)
            .bind(&input.color)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(
            status_id = %status.id,
            board_id = %status.board_id,
            priority,
            "Created status"
        );
        Ok(status)
    }

    /// Find a status by its ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Status>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM statuses WHERE id = ?1");
        sqlx::query_as::<_, Status>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the statuses of a board in priority order.
    pub async fn list_by_board(
        pool: &SqlitePool,
        board_id: DbId,
    ) -> Result<Vec<Status>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM statuses WHERE board_id = ?1 ORDER BY priority");
        sqlx::query_as::<_, Status>(&query)
            .bind(board_id)
            .fetch_all(pool)
            .await
    }

    /// Update a status. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateStatus,
    ) -> Result<Option<Status>, sqlx::Error> {
        let query = format!(
            "UPDATE statuses SET
                title = COALESCE(?2, title),
                color = COALESCE(?3, color),
                updated_at = ?4
             WHERE id = ?1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Status>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.color)
            .bind(Utc::now())
            .fetch_optional(pool)
            .await
    }

    /// Delete a status with its books, their comments and tag links, then
    /// renumber the remaining statuses of the board. Returns `true` if a
    /// row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let board_id: Option<DbId> =
            sqlx::query_scalar("SELECT board_id FROM statuses WHERE id = ?1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(board_id) = board_id else {
            return Ok(false);
        };

        sqlx::query(
            "DELETE FROM comments WHERE book_id IN (SELECT id FROM books WHERE status_id = ?1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "DELETE FROM book_tags WHERE book_id IN (SELECT id FROM books WHERE status_id = ?1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM books WHERE status_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM statuses WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        OrderRepo::renumber(&mut tx, OrderedKind::Status, board_id).await?;
        tx.commit().await?;

        tracing::info!(status_id = %id, board_id = %board_id, "Deleted status");
        Ok(true)
    }

    /// Move a status within its board or to another board.
    pub async fn move_status(
        pool: &SqlitePool,
        request: &MoveRequest<DbId>,
    ) -> Result<MoveOutcome, sqlx::Error> {
        OrderRepo::move_item(pool, OrderedKind::Status, request).await
    }
}
