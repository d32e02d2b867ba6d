//! Integration tests for priority maintenance across boards, statuses and books.
//!
//! Exercises the repository layer against an in-memory database:
//! - In-place and cross-container moves
//! - Rejected moves leave the store untouched
//! - Deletes close gaps
//! - Contiguity after mixed operation sequences

use assert_matches::assert_matches;
use booklog_core::reorder::{is_contiguous, MoveRejection, MoveRequest};
use booklog_core::types::DbId;
use booklog_db::models::board::CreateBoard;
use booklog_db::models::book::{Book, CreateBook};
use booklog_db::models::status::UpdateStatus;
use booklog_db::repositories::{BoardRepo, BookRepo, MoveOutcome, StatusRepo};
use sqlx::SqlitePool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn setup() -> SqlitePool {
    let pool = booklog_db::create_memory_pool().await.unwrap();
    booklog_db::run_migrations(&pool).await.unwrap();
    pool
}

/// A board with its default statuses; returns `(board_id, status_ids)`.
async fn board(pool: &SqlitePool, name: &str) -> (DbId, Vec<DbId>) {
    let created = BoardRepo::create(
        pool,
        &CreateBoard {
            name: name.to_string(),
        },
    )
    .await
    .unwrap();
    let statuses = created.statuses.iter().map(|s| s.id).collect();
    (created.board.id, statuses)
}

async fn books(pool: &SqlitePool, status_id: DbId, titles: &[&str]) -> Vec<DbId> {
    let mut ids = Vec::new();
    for title in titles {
        let book = BookRepo::create(
            pool,
            &CreateBook {
                status_id,
                title: title.to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        ids.push(book.id);
    }
    ids
}

async fn titles_in(pool: &SqlitePool, status_id: DbId) -> Vec<(String, i64)> {
    BookRepo::list_by_status(pool, status_id)
        .await
        .unwrap()
        .into_iter()
        .map(|b| (b.title, b.priority))
        .collect()
}

async fn titles_only(pool: &SqlitePool, status_id: DbId) -> Vec<String> {
    titles_in(pool, status_id)
        .await
        .into_iter()
        .map(|(title, _)| title)
        .collect()
}

fn move_request(
    source_item: DbId,
    source_container: DbId,
    destination_item: Option<DbId>,
    destination_container: DbId,
) -> MoveRequest<DbId> {
    MoveRequest {
        source_item,
        source_container,
        destination_item,
        destination_container,
        insert_at_end: false,
    }
}

/// Every book row, for before/after comparisons.
async fn snapshot(pool: &SqlitePool) -> Vec<Book> {
    sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY id")
        .fetch_all(pool)
        .await
        .unwrap()
}

async fn assert_all_contiguous(pool: &SqlitePool) {
    let boards: Vec<i64> = sqlx::query_scalar("SELECT priority FROM boards")
        .fetch_all(pool)
        .await
        .unwrap();
    assert!(is_contiguous(&boards), "board priorities {boards:?}");

    let parents: Vec<(DbId, String)> = sqlx::query_as(
        "SELECT id, 'board' FROM boards UNION ALL SELECT id, 'status' FROM statuses",
    )
    .fetch_all(pool)
    .await
    .unwrap();
    for (parent, kind) in parents {
        let query = if kind == "board" {
            "SELECT priority FROM statuses WHERE board_id = ?1"
        } else {
            "SELECT priority FROM books WHERE status_id = ?1"
        };
        let priorities: Vec<i64> = sqlx::query_scalar(query)
            .bind(parent)
            .fetch_all(pool)
            .await
            .unwrap();
        assert!(is_contiguous(&priorities), "{kind} {parent}: {priorities:?}");
    }
}

// ---------------------------------------------------------------------------
// In-place moves
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_move_first_book_onto_third() {
    let pool = setup().await;
    let (_, statuses) = board(&pool, "Reading").await;
    let ids = books(&pool, statuses[0], &["B0", "B1", "B2", "B3", "B4"]).await;

    let request = move_request(ids[0], statuses[0], Some(ids[2]), statuses[0]);
    let outcome = BookRepo::move_book(&pool, &request).await.unwrap();
    assert!(outcome.is_moved());
    assert_eq!(outcome.affected_containers(), vec![statuses[0]]);

    assert_eq!(
        titles_in(&pool, statuses[0]).await,
        vec![
            ("B1".to_string(), 0),
            ("B2".to_string(), 1),
            ("B0".to_string(), 2),
            ("B3".to_string(), 3),
            ("B4".to_string(), 4),
        ]
    );
}

#[tokio::test]
async fn test_move_to_end_of_same_status() {
    let pool = setup().await;
    let (_, statuses) = board(&pool, "Reading").await;
    let ids = books(&pool, statuses[1], &["A", "B", "C"]).await;

    let mut request = move_request(ids[0], statuses[1], Some(ids[1]), statuses[1]);
    request.insert_at_end = true;
    BookRepo::move_book(&pool, &request).await.unwrap();

    let titles = titles_only(&pool, statuses[1]).await;
    assert_eq!(titles, vec!["B", "C", "A"]);
}

#[tokio::test]
async fn test_self_drop_is_rejected_without_writes() {
    let pool = setup().await;
    let (_, statuses) = board(&pool, "Reading").await;
    let ids = books(&pool, statuses[0], &["A", "B"]).await;
    let before = snapshot(&pool).await;

    let request = move_request(ids[0], statuses[0], Some(ids[0]), statuses[0]);
    let outcome = BookRepo::move_book(&pool, &request).await.unwrap();

    assert_eq!(outcome, MoveOutcome::Rejected(MoveRejection::SelfDrop));
    assert_eq!(snapshot(&pool).await, before);
}

// ---------------------------------------------------------------------------
// Cross-container moves
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_cross_move_onto_anchor() {
    let pool = setup().await;
    let (_, statuses) = board(&pool, "Reading").await;
    let (s1, s2) = (statuses[0], statuses[1]);
    let xs = books(&pool, s1, &["X0", "X1"]).await;
    let ys = books(&pool, s2, &["Y0", "Y1"]).await;

    let request = move_request(xs[0], s1, Some(ys[1]), s2);
    let outcome = BookRepo::move_book(&pool, &request).await.unwrap();
    assert_eq!(
        outcome,
        MoveOutcome::Moved {
            source_container: s1,
            destination_container: s2
        }
    );

    assert_eq!(titles_in(&pool, s1).await, vec![("X1".to_string(), 0)]);
    assert_eq!(
        titles_in(&pool, s2).await,
        vec![
            ("Y0".to_string(), 0),
            ("X0".to_string(), 1),
            ("Y1".to_string(), 2),
        ]
    );
    let moved = BookRepo::find_by_id(&pool, xs[0]).await.unwrap().unwrap();
    assert_eq!(moved.status_id, s2);
}

#[tokio::test]
async fn test_cross_move_into_empty_status() {
    let pool = setup().await;
    let (_, statuses) = board(&pool, "Reading").await;
    let (s1, s3) = (statuses[0], statuses[2]);
    let xs = books(&pool, s1, &["X0", "X1", "X2"]).await;

    let request = move_request(xs[0], s1, None, s3);
    let outcome = BookRepo::move_book(&pool, &request).await.unwrap();
    assert!(outcome.is_moved());

    assert_eq!(titles_in(&pool, s3).await, vec![("X0".to_string(), 0)]);
    assert_eq!(
        titles_in(&pool, s1).await,
        vec![("X1".to_string(), 0), ("X2".to_string(), 1)]
    );
}

#[tokio::test]
async fn test_anchorless_drop_on_populated_status_goes_first() {
    let pool = setup().await;
    let (_, statuses) = board(&pool, "Reading").await;
    let xs = books(&pool, statuses[0], &["X0"]).await;
    books(&pool, statuses[1], &["Y0", "Y1"]).await;

    BookRepo::move_book(&pool, &move_request(xs[0], statuses[0], None, statuses[1]))
        .await
        .unwrap();

    let titles = titles_only(&pool, statuses[1]).await;
    assert_eq!(titles, vec!["X0", "Y0", "Y1"]);
    assert_all_contiguous(&pool).await;
}

#[tokio::test]
async fn test_status_moves_to_another_board() {
    let pool = setup().await;
    let (first, first_statuses) = board(&pool, "Fiction").await;
    let (second, second_statuses) = board(&pool, "Non-fiction").await;

    // Titles are unique per board, so rename before moving a default column.
    let renamed = StatusRepo::update(
        &pool,
        first_statuses[1],
        &UpdateStatus {
            title: Some("Wishlist".to_string()),
            color: None,
        },
    )
    .await
    .unwrap()
    .unwrap();

    let outcome = StatusRepo::move_status(
        &pool,
        &move_request(renamed.id, first, Some(second_statuses[0]), second),
    )
    .await
    .unwrap();
    assert!(outcome.is_moved());

    let titles: Vec<String> = StatusRepo::list_by_board(&pool, second)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.title)
        .collect();
    assert_eq!(titles, vec!["Wishlist", "Backlog", "Todo", "In progress", "Completed"]);
    assert_eq!(StatusRepo::list_by_board(&pool, first).await.unwrap().len(), 3);
    assert_all_contiguous(&pool).await;
}

#[tokio::test]
async fn test_duplicate_title_in_destination_rolls_back() {
    let pool = setup().await;
    let (_, statuses) = board(&pool, "Reading").await;
    let xs = books(&pool, statuses[0], &["Dune", "Emma"]).await;
    books(&pool, statuses[1], &["Dune"]).await;
    let before = snapshot(&pool).await;

    let request = move_request(xs[0], statuses[0], None, statuses[1]);
    let result = BookRepo::move_book(&pool, &request).await;

    let err = result.unwrap_err();
    assert!(booklog_db::is_unique_violation(&err), "unexpected error: {err}");
    assert_eq!(snapshot(&pool).await, before);
}

// ---------------------------------------------------------------------------
// Rejections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_unknown_ids_are_rejected_without_writes() {
    let pool = setup().await;
    let (_, statuses) = board(&pool, "Reading").await;
    let xs = books(&pool, statuses[0], &["X0", "X1"]).await;
    let before = snapshot(&pool).await;
    let ghost = booklog_core::types::new_id();

    let request = move_request(ghost, statuses[0], Some(xs[1]), statuses[0]);
    let missing_source = BookRepo::move_book(&pool, &request).await.unwrap();
    assert_matches!(missing_source, MoveOutcome::Rejected(MoveRejection::SourceNotFound));

    let request = move_request(xs[0], statuses[0], Some(ghost), statuses[1]);
    let missing_anchor = BookRepo::move_book(&pool, &request).await.unwrap();
    assert_matches!(missing_anchor, MoveOutcome::Rejected(MoveRejection::DestinationNotFound));

    let request = move_request(xs[0], statuses[0], None, ghost);
    let missing_container = BookRepo::move_book(&pool, &request).await.unwrap();
    assert_matches!(missing_container, MoveOutcome::Rejected(MoveRejection::DestinationNotFound));

    assert_eq!(snapshot(&pool).await, before);
}

// ---------------------------------------------------------------------------
// Deletes and appends
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_delete_from_middle_closes_gap() {
    let pool = setup().await;
    let (_, statuses) = board(&pool, "Reading").await;
    let ids = books(&pool, statuses[0], &["A", "B", "C", "D", "E"]).await;

    assert!(BookRepo::delete(&pool, ids[2]).await.unwrap());

    assert_eq!(
        titles_in(&pool, statuses[0]).await,
        vec![
            ("A".to_string(), 0),
            ("B".to_string(), 1),
            ("D".to_string(), 2),
            ("E".to_string(), 3),
        ]
    );
}

#[tokio::test]
async fn test_boards_append_and_renumber() {
    let pool = setup().await;
    let (a, _) = board(&pool, "A").await;
    let (b, _) = board(&pool, "B").await;
    let (c, _) = board(&pool, "C").await;

    let outcome = BoardRepo::move_board(&pool, c, Some(a), false).await.unwrap();
    assert!(outcome.is_moved());
    let order: Vec<DbId> = BoardRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(order, vec![c, a, b]);

    assert!(BoardRepo::delete(&pool, a).await.unwrap());
    let remaining: Vec<(DbId, i64)> = BoardRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|b| (b.id, b.priority))
        .collect();
    assert_eq!(remaining, vec![(c, 0), (b, 1)]);
}

#[tokio::test]
async fn test_mixed_sequence_keeps_every_container_contiguous() {
    let pool = setup().await;
    let (_, statuses) = board(&pool, "Reading").await;
    let (_, other) = board(&pool, "Archive").await;
    let a = books(&pool, statuses[0], &["a0", "a1", "a2", "a3"]).await;
    let b = books(&pool, statuses[1], &["b0", "b1"]).await;

    BookRepo::move_book(&pool, &move_request(a[3], statuses[0], Some(a[0]), statuses[0]))
        .await
        .unwrap();
    BookRepo::move_book(&pool, &move_request(a[1], statuses[0], Some(b[1]), statuses[1]))
        .await
        .unwrap();
    BookRepo::delete(&pool, b[0]).await.unwrap();
    BookRepo::move_book(&pool, &move_request(a[2], statuses[0], None, other[3]))
        .await
        .unwrap();
    books(&pool, statuses[0], &["a4"]).await;
    StatusRepo::delete(&pool, statuses[2]).await.unwrap();

    let mut request = move_request(b[1], statuses[1], Some(a[0]), statuses[0]);
    request.insert_at_end = true;
    BookRepo::move_book(&pool, &request).await.unwrap();

    assert_all_contiguous(&pool).await;
    let titles = titles_only(&pool, statuses[0]).await;
    assert_eq!(titles, vec!["a3", "a0", "a4", "b1"]);
}
