//! Repository for the `boards` table.

use booklog_core::defaults::DEFAULT_STATUSES;
use booklog_core::reorder::{next_priority, MoveRequest};
use booklog_core::types::{new_id, DbId};
use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::board::{Board, BoardWithStatuses, CreateBoard, UpdateBoard};
use crate::models::status::Status;
use crate::repositories::order_repo::{MoveOutcome, OrderRepo, OrderedKind, BOARD_LIST_ID};
use crate::repositories::status_repo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, priority, created_at, updated_at";

/// Provides CRUD and ordering operations for boards.
pub struct BoardRepo;

impl BoardRepo {
    /// Insert a new board after all existing boards, seeded with the
    /// default statuses, in one transaction.
    pub async fn create(
        pool: &SqlitePool,
        input: &CreateBoard,
    ) -> Result<BoardWithStatuses, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let now = Utc::now();
        let count = OrderRepo::count(&mut tx, OrderedKind::Board, BOARD_LIST_ID).await?;
        let priority = next_priority(count);

        let query = format!(
            "INSERT INTO boards (id, name, priority, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)
             RETURNING {COLUMNS}"
        );
        let board = sqlx::query_as::<_, Board>(&query)
            .bind(new_id())
            .bind(&input.name)
            .bind(priority)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        let insert_status = format!(
            "INSERT INTO statuses (id, board_id, title, priority, color, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             RETURNING {}",
            status_repo::COLUMNS
        );
        let mut statuses = Vec::with_capacity(DEFAULT_STATUSES.len());
        for (index, seed) in DEFAULT_STATUSES.iter().enumerate() {
            let status = sqlx::query_as::<_, Status>(&insert_status)
                .bind(new_id())
                .bind(board.id)
                .bind(seed.title)
                .bind(next_priority(index))
                .bind(seed.color)
                .bind(now)
                .fetch_one(&mut *tx)
                .await?;
            statuses.push(status);
        }

        tx.commit().await?;
        tracing::info!(board_id = %board.id, name = %board.name, "Created board");
        Ok(BoardWithStatuses { board, statuses })
    }

    /// Find a board by its ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Board>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM boards WHERE id = ?1");
        sqlx::query_as::<_, Board>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a board by its unique name.
    pub async fn find_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Board>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM boards WHERE name = ?1");
        sqlx::query_as::<_, Board>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List all boards in priority order.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Board>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM boards ORDER BY priority");
        sqlx::query_as::<_, Board>(&query).fetch_all(pool).await
    }

    /// Find a board by ID, enriched with its statuses.
    pub async fn find_with_statuses(
        pool: &SqlitePool,
        id: DbId,
    ) -> Result<Option<BoardWithStatuses>, sqlx::Error> {
        match Self::find_by_id(pool, id).await? {
            Some(board) => {
                let statuses = status_repo::StatusRepo::list_by_board(pool, board.id).await?;
                Ok(Some(BoardWithStatuses { board, statuses }))
            }
            None => Ok(None),
        }
    }

    /// Rename a board. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateBoard,
    ) -> Result<Option<Board>, sqlx::Error> {
        let query = format!(
            "UPDATE boards SET
                name = COALESCE(?2, name),
                updated_at = ?3
             WHERE id = ?1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Board>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(Utc::now())
            .fetch_optional(pool)
            .await
    }

    /// Delete a board with its statuses, books, comments and tag links,
    /// then close the gap in the board list. Returns `true` if a row was
    /// removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let books_of_board = "SELECT b.id FROM books b
             JOIN statuses s ON s.id = b.status_id
             WHERE s.board_id = ?1";
        sqlx::query(&format!("DELETE FROM comments WHERE book_id IN ({books_of_board})"))
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(&format!("DELETE FROM book_tags WHERE book_id IN ({books_of_board})"))
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "DELETE FROM books WHERE status_id IN (SELECT id FROM statuses WHERE board_id = ?1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM statuses WHERE board_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM boards WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        OrderRepo::renumber(&mut tx, OrderedKind::Board, BOARD_LIST_ID).await?;
        tx.commit().await?;

        tracing::info!(board_id = %id, "Deleted board");
        Ok(true)
    }

    /// Reorder the board list by dropping `source` onto `destination`.
    pub async fn move_board(
        pool: &SqlitePool,
        source: DbId,
        destination: Option<DbId>,
        insert_at_end: bool,
    ) -> Result<MoveOutcome, sqlx::Error> {
        let request = MoveRequest {
            source_item: source,
            source_container: BOARD_LIST_ID,
            destination_item: destination,
            destination_container: BOARD_LIST_ID,
            insert_at_end,
        };
        OrderRepo::move_item(pool, OrderedKind::Board, &request).await
    }
}
