//! Priority bookkeeping shared by the `boards`, `statuses` and `books` tables.
//!
//! Each of those tables is a set of ordered containers: all boards form one
//! list, the statuses of a board form a list, the books of a status form a
//! list. SQLite checks `UNIQUE (parent, priority)` row by row, so every
//! rewrite first parks the affected rows at distinct negative priorities
//! and then assigns their final `0..n-1` values.

use booklog_core::reorder::{assign_priorities, plan_move, MoveRejection, MoveRequest};
use booklog_core::types::{DbId, Priority};
use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

/// Container id standing for "the list of all boards", which has no parent row.
pub const BOARD_LIST_ID: DbId = uuid::Uuid::nil();

/// The three ordered tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderedKind {
    Board,
    Status,
    Book,
}

impl OrderedKind {
    fn table(self) -> &'static str {
        match self {
            OrderedKind::Board => "boards",
            OrderedKind::Status => "statuses",
            OrderedKind::Book => "books",
        }
    }

    /// Foreign-key column pointing at the container, if any.
    fn parent_column(self) -> Option<&'static str> {
        match self {
            OrderedKind::Board => None,
            OrderedKind::Status => Some("board_id"),
            OrderedKind::Book => Some("status_id"),
        }
    }

    /// Table holding the containers themselves.
    fn parent_table(self) -> Option<&'static str> {
        match self {
            OrderedKind::Board => None,
            OrderedKind::Status => Some("boards"),
            OrderedKind::Book => Some("statuses"),
        }
    }

    pub fn entity(self) -> &'static str {
        match self {
            OrderedKind::Board => "board",
            OrderedKind::Status => "status",
            OrderedKind::Book => "book",
        }
    }
}

/// Result of a move. Only `Moved` wrote anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was committed; views showing these containers must re-fetch.
    Moved {
        source_container: DbId,
        destination_container: DbId,
    },
    /// Nothing was written.
    Rejected(MoveRejection),
}

impl MoveOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }

    /// Containers whose contents changed, without duplicates.
    pub fn affected_containers(&self) -> Vec<DbId> {
        match self {
            MoveOutcome::Moved {
                source_container,
                destination_container,
            } if source_container == destination_container => vec![*source_container],
            MoveOutcome::Moved {
                source_container,
                destination_container,
            } => vec![*source_container, *destination_container],
            MoveOutcome::Rejected(_) => Vec::new(),
        }
    }
}

/// Priority maintenance for the ordered tables.
pub struct OrderRepo;

impl OrderRepo {
    /// Move an item within or across containers as one transaction.
    ///
    /// Both affected containers end up numbered `0..n-1`. A rejected move
    /// rolls back without writing.
    pub async fn move_item(
        pool: &SqlitePool,
        kind: OrderedKind,
        request: &MoveRequest<DbId>,
    ) -> Result<MoveOutcome, sqlx::Error> {
        if request.is_self_drop() {
            tracing::debug!(
                kind = kind.entity(),
                item = %request.source_item,
                "Ignoring self drop"
            );
            return Ok(MoveOutcome::Rejected(MoveRejection::SelfDrop));
        }

        let mut tx = pool.begin().await?;

        let source_items = Self::ordered_ids(&mut tx, kind, request.source_container).await?;
        let destination_items = if request.is_cross_container() {
            if !Self::container_exists(&mut tx, kind, request.destination_container).await? {
                tracing::debug!(
                    kind = kind.entity(),
                    container = %request.destination_container,
                    "Destination container does not exist"
                );
                return Ok(MoveOutcome::Rejected(MoveRejection::DestinationNotFound));
            }
            Self::ordered_ids(&mut tx, kind, request.destination_container).await?
        } else {
            Vec::new()
        };

        let plan = match plan_move(request, &source_items, &destination_items) {
            Ok(plan) => plan,
            Err(rejection) => {
                tracing::debug!(
                    kind = kind.entity(),
                    item = %request.source_item,
                    %rejection,
                    "Move rejected"
                );
                return Ok(MoveOutcome::Rejected(rejection));
            }
        };

        let mut orders: Vec<(DbId, &[DbId])> = Vec::with_capacity(2);
        if let Some(source) = plan.source_order() {
            orders.push((request.source_container, source));
        }
        orders.push((request.destination_container, plan.destination_order()));
        Self::write_orders(&mut tx, kind, &orders).await?;

        let touch = format!("UPDATE {} SET updated_at = ?1 WHERE id = ?2", kind.table());
        sqlx::query(&touch)
            .bind(Utc::now())
            .bind(request.source_item)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            kind = kind.entity(),
            item = %request.source_item,
            from = %request.source_container,
            to = %request.destination_container,
            "Moved item"
        );
        Ok(MoveOutcome::Moved {
            source_container: request.source_container,
            destination_container: request.destination_container,
        })
    }

    /// Ids of a container's children in priority order.
    pub async fn ordered_ids(
        conn: &mut SqliteConnection,
        kind: OrderedKind,
        container: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        match kind.parent_column() {
            Some(parent) => {
                let query = format!(
                    "SELECT id FROM {} WHERE {parent} = ?1 ORDER BY priority",
                    kind.table()
                );
                sqlx::query_scalar::<_, DbId>(&query)
                    .bind(container)
                    .fetch_all(&mut *conn)
                    .await
            }
            None => {
                let query = format!("SELECT id FROM {} ORDER BY priority", kind.table());
                sqlx::query_scalar::<_, DbId>(&query)
                    .fetch_all(&mut *conn)
                    .await
            }
        }
    }

    /// Number of children in a container; also the priority of the next append.
    pub async fn count(
        conn: &mut SqliteConnection,
        kind: OrderedKind,
        container: DbId,
    ) -> Result<usize, sqlx::Error> {
        let count: i64 = match kind.parent_column() {
            Some(parent) => {
                let query = format!("SELECT COUNT(*) FROM {} WHERE {parent} = ?1", kind.table());
                sqlx::query_scalar(&query)
                    .bind(container)
                    .fetch_one(&mut *conn)
                    .await?
            }
            None => {
                let query = format!("SELECT COUNT(*) FROM {}", kind.table());
                sqlx::query_scalar(&query).fetch_one(&mut *conn).await?
            }
        };
        Ok(count as usize)
    }

    /// Renumber a container's children `0..n-1`, keeping their relative order.
    pub async fn renumber(
        conn: &mut SqliteConnection,
        kind: OrderedKind,
        container: DbId,
    ) -> Result<(), sqlx::Error> {
        let order = Self::ordered_ids(conn, kind, container).await?;
        Self::write_orders(conn, kind, &[(container, order.as_slice())]).await
    }

    /// Assign every listed id its index as priority and its list's container
    /// as parent.
    async fn write_orders(
        conn: &mut SqliteConnection,
        kind: OrderedKind,
        orders: &[(DbId, &[DbId])],
    ) -> Result<(), sqlx::Error> {
        // Phase 1: park at distinct negative priorities.
        let mut parked: Priority = 0;
        for (container, order) in orders {
            for id in order.iter() {
                parked -= 1;
                Self::write_position(conn, kind, *id, *container, parked).await?;
            }
        }

        // Phase 2: final positions.
        for (container, order) in orders {
            for (id, priority) in assign_priorities(order) {
                Self::write_position(conn, kind, id, *container, priority).await?;
            }
        }
        Ok(())
    }

    async fn write_position(
        conn: &mut SqliteConnection,
        kind: OrderedKind,
        id: DbId,
        container: DbId,
        priority: Priority,
    ) -> Result<(), sqlx::Error> {
        match kind.parent_column() {
            Some(parent) => {
                let query = format!(
                    "UPDATE {} SET {parent} = ?1, priority = ?2 WHERE id = ?3",
                    kind.table()
                );
                sqlx::query(&query)
                    .bind(container)
                    .bind(priority)
                    .bind(id)
                    .execute(&mut *conn)
                    .await?;
            }
            None => {
                let query = format!("UPDATE {} SET priority = ?1 WHERE id = ?2", kind.table());
                sqlx::query(&query)
                    .bind(priority)
                    .bind(id)
                    .execute(&mut *conn)
                    .await?;
            }
        }
        Ok(())
    }

    async fn container_exists(
        conn: &mut SqliteConnection,
        kind: OrderedKind,
        container: DbId,
    ) -> Result<bool, sqlx::Error> {
        let Some(parent_table) = kind.parent_table() else {
            return Ok(container == BOARD_LIST_ID);
        };
        let query = format!("SELECT COUNT(*) FROM {parent_table} WHERE id = ?1");
        let count: i64 = sqlx::query_scalar(&query)
            .bind(container)
            .fetch_one(&mut *conn)
            .await?;
        Ok(count > 0)
    }
}
