//! Integration tests for the [`Booklog`] facade against an in-memory store
//! and a canned metadata provider.

use std::sync::Arc;

use assert_matches::assert_matches;
use async_trait::async_trait;
use booklog_app::{AppError, Booklog};
use booklog_core::barcode::Isbn;
use booklog_core::drag::{DragKind, DragPayload};
use booklog_core::error::CoreError;
use booklog_core::progress::ReadProgress;
use booklog_core::reorder::MoveRequest;
use booklog_db::models::book::CreateBook;
use booklog_db::repositories::BOARD_LIST_ID;
use booklog_events::{event_types, EntityKind, EventBus};
use booklog_metadata::{BookMetadata, BookMetadataProvider, MetadataError};
use tokio_util::sync::CancellationToken;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Answers every query with the same volume; `None` means nothing matches.
struct FakeProvider {
    hit: Option<BookMetadata>,
}

#[async_trait]
impl BookMetadataProvider for FakeProvider {
    async fn search(&self, _keyword: &str) -> Result<Vec<BookMetadata>, MetadataError> {
        self.hit.clone().map(|hit| vec![hit]).ok_or(MetadataError::NotFound)
    }

    async fn lookup_isbn(&self, _isbn: &Isbn) -> Result<BookMetadata, MetadataError> {
        self.hit.clone().ok_or(MetadataError::NotFound)
    }
}

/// Never answers.
struct HangingProvider;

#[async_trait]
impl BookMetadataProvider for HangingProvider {
    async fn search(&self, _keyword: &str) -> Result<Vec<BookMetadata>, MetadataError> {
        std::future::pending().await
    }

    async fn lookup_isbn(&self, _isbn: &Isbn) -> Result<BookMetadata, MetadataError> {
        std::future::pending().await
    }
}

fn sample_metadata() -> BookMetadata {
    BookMetadata {
        title: "Zero to Production in Rust".into(),
        authors: vec!["Luca Palmieri".into()],
        publisher: None,
        published_date: Some("2022".into()),
        description: None,
        small_thumbnail: None,
        thumbnail: Some("http://books.google.com/cover".into()),
    }
}

async fn booklog_with(provider: Arc<dyn BookMetadataProvider>) -> Booklog {
    let pool = booklog_db::create_memory_pool().await.unwrap();
    booklog_db::run_migrations(&pool).await.unwrap();
    Booklog::new(pool, Arc::new(EventBus::default()), provider)
}

async fn booklog() -> Booklog {
    booklog_with(Arc::new(FakeProvider {
        hit: Some(sample_metadata()),
    }))
    .await
}

fn new_book(status_id: booklog_core::types::DbId, title: &str) -> CreateBook {
    CreateBook {
        status_id,
        title: title.to_string(),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Boards
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_ensure_default_board_is_idempotent() {
    let app = booklog().await;

    let first = app.ensure_default_board().await.unwrap();
    assert_eq!(first.name, "Default");
    let again = app.ensure_default_board().await.unwrap();
    assert_eq!(again.id, first.id);
    assert_eq!(app.boards().await.unwrap().len(), 1);
    assert_eq!(app.statuses(first.id).await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_delete_board_selects_first_remaining() {
    let app = booklog().await;
    let a = app.create_board("A").await.unwrap().board;
    let b = app.create_board("B").await.unwrap().board;

    let next = app.delete_board(a.id).await.unwrap();
    assert_eq!(next.map(|board| board.id), Some(b.id));

    assert_eq!(app.delete_board(b.id).await.unwrap(), None);
    assert_matches!(
        app.delete_board(b.id).await,
        Err(AppError::Core(CoreError::NotFound { entity: "board", .. }))
    );
}

#[tokio::test]
async fn test_duplicate_board_name_alerts() {
    let app = booklog().await;
    app.create_board("Shelf").await.unwrap();

    let err = app.create_board("  Shelf ").await.unwrap_err();
    assert_eq!(err.alert_message(), "An item with the same name already exists");
}

#[tokio::test]
async fn test_blank_board_name_is_invalid() {
    let app = booklog().await;
    assert_matches!(
        app.create_board("   ").await,
        Err(AppError::Core(CoreError::Validation(_)))
    );
}

// ---------------------------------------------------------------------------
// Books
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_add_book_to_missing_status() {
    let app = booklog().await;
    let err = app
        .add_book(new_book(booklog_core::types::new_id(), "Orphan"))
        .await
        .unwrap_err();
    assert_eq!(err.alert_message(), "Status cannot be found");
}

#[tokio::test]
async fn test_move_book_publishes_affected_containers() {
    let app = booklog().await;
    let board = app.create_board("Reading").await.unwrap();
    let (s1, s2) = (board.statuses[0].id, board.statuses[1].id);
    let book = app.add_book(new_book(s1, "Mover")).await.unwrap();

    let mut rx = app.events().subscribe();
    let outcome = app
        .move_book(&MoveRequest {
            source_item: book.id,
            source_container: s1,
            destination_item: None,
            destination_container: s2,
            insert_at_end: false,
        })
        .await
        .unwrap();
    assert!(outcome.is_moved());

    let event = rx.recv().await.unwrap();
    assert_eq!(event.event_type, event_types::BOOK_MOVED);
    assert_eq!(event.entity, EntityKind::Book);
    assert_eq!(event.entity_id, book.id);
    assert_eq!(event.containers, vec![s1, s2]);
}

#[tokio::test]
async fn test_writes_name_the_container_to_refetch() {
    let app = booklog().await;
    let mut rx = app.events().subscribe();

    let board = app.create_board("Reading").await.unwrap();
    let created = rx.recv().await.unwrap();
    assert_eq!(created.event_type, event_types::BOARD_CREATED);
    assert!(created.touches(BOARD_LIST_ID));

    let status = app.add_status(board.board.id, "Paused", "#aabbcc").await.unwrap();
    assert!(rx.recv().await.unwrap().touches(board.board.id));

    let book = app.add_book(new_book(status.id, "Gone soon")).await.unwrap();
    assert!(rx.recv().await.unwrap().touches(status.id));

    let comment = app.add_comment(book.id, "note").await.unwrap();
    let commented = rx.recv().await.unwrap();
    assert_eq!(commented.entity, EntityKind::Comment);
    assert!(commented.touches(book.id));

    app.delete_comment(comment.id).await.unwrap();
    assert!(rx.recv().await.unwrap().touches(book.id));

    app.delete_book(book.id).await.unwrap();
    let deleted = rx.recv().await.unwrap();
    assert_eq!(deleted.event_type, event_types::BOOK_DELETED);
    assert_eq!(deleted.containers, vec![status.id]);

    app.delete_status(status.id).await.unwrap();
    let removed = rx.recv().await.unwrap();
    assert_eq!(removed.event_type, event_types::STATUS_DELETED);
    assert_eq!(removed.containers, vec![board.board.id]);
}

#[tokio::test]
async fn test_rejected_move_publishes_nothing() {
    let app = booklog().await;
    let board = app.create_board("Reading").await.unwrap();
    let s1 = board.statuses[0].id;
    let book = app.add_book(new_book(s1, "Stuck")).await.unwrap();

    let mut rx = app.events().subscribe();
    let outcome = app
        .move_book(&MoveRequest {
            source_item: book.id,
            source_container: s1,
            destination_item: Some(book.id),
            destination_container: s1,
            insert_at_end: false,
        })
        .await
        .unwrap();
    assert!(!outcome.is_moved());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_progress_and_deadlines() {
    let app = booklog().await;
    let board = app.create_board("Reading").await.unwrap();
    let status_id = board.statuses[2].id;
    let late = app.add_book(new_book(status_id, "Late")).await.unwrap();
    let later = app.add_book(new_book(status_id, "Later")).await.unwrap();
    app.add_book(new_book(status_id, "Open ended")).await.unwrap();

    let now = chrono::Utc::now();
    app.set_deadline(later.id, Some(now - chrono::Duration::days(1)))
        .await
        .unwrap();
    let late = app
        .set_deadline(late.id, Some(now - chrono::Duration::days(3)))
        .await
        .unwrap();
    assert!(late.is_overdue(now));

    let due: Vec<String> = app
        .books_due_before(now)
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.title)
        .collect();
    assert_eq!(due, vec!["Late", "Later"]);

    let progress = ReadProgress::new(30, 120).unwrap();
    let book = app.set_progress(late.id, Some(progress)).await.unwrap();
    assert_eq!(book.progress().map(|p| p.fraction()), Some(0.25));

    let overshoot = ReadProgress {
        current_page: 200,
        total_page: 120,
    };
    assert_matches!(
        app.set_progress(late.id, Some(overshoot)).await,
        Err(AppError::Core(CoreError::Validation(_)))
    );
}

// ---------------------------------------------------------------------------
// Drag and drop
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_handle_drop_moves_book() {
    let app = booklog().await;
    let board = app.create_board("Reading").await.unwrap();
    let (s1, s2) = (board.statuses[0].id, board.statuses[1].id);
    let first = app.add_book(new_book(s1, "First")).await.unwrap();
    let anchor = app.add_book(new_book(s2, "Anchor")).await.unwrap();

    let payload = DragPayload::book(first.id, s1).encode().unwrap();
    assert!(app
        .handle_drop(DragKind::Book, &payload, Some(anchor.id), s2, false)
        .await
        .unwrap());

    let titles: Vec<String> = app.books(s2).await.unwrap().into_iter().map(|b| b.title).collect();
    assert_eq!(titles, vec!["First", "Anchor"]);
    assert!(app.books(s1).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_handle_drop_rejects_wrong_kind_and_garbage() {
    let app = booklog().await;
    let board = app.create_board("Reading").await.unwrap();
    let status = &board.statuses[0];

    let payload = DragPayload::status(status.id, board.board.id).encode().unwrap();
    assert!(!app
        .handle_drop(DragKind::Book, &payload, None, board.statuses[1].id, false)
        .await
        .unwrap());
    assert!(!app
        .handle_drop(DragKind::Status, "not json", None, board.board.id, false)
        .await
        .unwrap());

    let order: Vec<String> = app
        .statuses(board.board.id)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.title)
        .collect();
    assert_eq!(order, vec!["Backlog", "Todo", "In progress", "Completed"]);
}

#[tokio::test]
async fn test_handle_drop_reorders_statuses() {
    let app = booklog().await;
    let board = app.create_board("Reading").await.unwrap();
    let completed = &board.statuses[3];

    let payload = DragPayload::status(completed.id, board.board.id).encode().unwrap();
    assert!(app
        .handle_drop(
            DragKind::Status,
            &payload,
            Some(board.statuses[0].id),
            board.board.id,
            false
        )
        .await
        .unwrap());

    let order: Vec<String> = app
        .statuses(board.board.id)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.title)
        .collect();
    assert_eq!(order, vec!["Completed", "Backlog", "Todo", "In progress"]);
}

// ---------------------------------------------------------------------------
// Tags and comments
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_tags_and_comments() {
    let app = booklog().await;
    let board = app.create_board("Reading").await.unwrap();
    let book = app.add_book(new_book(board.statuses[0].id, "Noted")).await.unwrap();

    let tag = app.create_tag("favourite", Some("#ff8800")).await.unwrap();
    assert_eq!(tag.color, "FF8800");
    assert!(app.toggle_tag(book.id, tag.id).await.unwrap());
    assert_eq!(app.tags_for_book(book.id).await.unwrap(), vec![tag.clone()]);
    assert!(!app.toggle_tag(book.id, tag.id).await.unwrap());

    assert_matches!(
        app.toggle_tag(book.id, booklog_core::types::new_id()).await,
        Err(AppError::Core(CoreError::NotFound { entity: "tag", .. }))
    );

    let comment = app.add_comment(book.id, "  great read ").await.unwrap();
    assert_eq!(comment.text, "great read");
    assert_matches!(
        app.add_comment(book.id, "   ").await,
        Err(AppError::Core(CoreError::Validation(_)))
    );

    assert_matches!(
        app.delete_comment(booklog_core::types::new_id()).await,
        Err(AppError::Core(CoreError::NotFound { entity: "comment", .. }))
    );

    app.delete_book(book.id).await.unwrap();
    assert!(app.comments(book.id).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Metadata lookups
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_search_and_add_from_metadata() {
    let app = booklog().await;
    let board = app.create_board("Reading").await.unwrap();
    let status_id = board.statuses[0].id;
    app.add_book(new_book(status_id, "Already here")).await.unwrap();

    let hits = app.search_books("zero to production").await.unwrap();
    let book = app.add_book_from_metadata(status_id, &hits[0]).await.unwrap();

    assert_eq!(book.priority, 1);
    assert_eq!(book.authors.0, vec!["Luca Palmieri".to_string()]);
    assert_eq!(book.cover_url(), "http://books.google.com/cover");
}

#[tokio::test]
async fn test_search_without_results_alerts() {
    let app = booklog_with(Arc::new(FakeProvider { hit: None })).await;

    let err = app.search_books("nothing").await.unwrap_err();
    assert_eq!(err.alert_message(), "No books were found");
    assert_matches!(
        app.search_books("  ").await,
        Err(AppError::Core(CoreError::Validation(_)))
    );
}

#[tokio::test]
async fn test_lookup_scanned_filters_barcodes() {
    let app = booklog().await;

    let price_code = app
        .lookup_scanned("1920123456789", CancellationToken::new())
        .await
        .unwrap();
    assert!(price_code.is_none());

    let hit = app
        .lookup_scanned("9784297127473", CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(hit, Some(sample_metadata()));
}

#[tokio::test]
async fn test_lookup_scanned_cancelled() {
    let app = booklog_with(Arc::new(HangingProvider)).await;
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = app.lookup_scanned("9784297127473", cancel).await.unwrap();
    assert!(result.is_none());
}
