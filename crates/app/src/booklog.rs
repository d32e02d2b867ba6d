//! The facade: one async method per user gesture.

use std::sync::Arc;

use booklog_core::barcode;
use booklog_core::color::normalize_hex;
use booklog_core::drag::{DragKind, DragPayload};
use booklog_core::error::CoreError;
use booklog_core::progress::ReadProgress;
use booklog_core::reorder::MoveRequest;
use booklog_core::types::{DbId, Timestamp};
use booklog_db::models::board::{Board, BoardWithStatuses, CreateBoard, UpdateBoard};
use booklog_db::models::book::{Book, CreateBook, UpdateBook};
use booklog_db::models::comment::{Comment, CreateComment};
use booklog_db::models::status::{CreateStatus, Status, UpdateStatus};
use booklog_db::models::tag::{CreateTag, Tag, UpdateTag};
use booklog_db::repositories::{
    BoardRepo, BookRepo, CommentRepo, MoveOutcome, StatusRepo, TagRepo, BOARD_LIST_ID,
};
use booklog_db::DbPool;
use booklog_events::{event_types, EntityKind, EventBus, LibraryEvent};
use booklog_metadata::{BookMetadata, BookMetadataProvider, GoogleBooksApi, MetadataError};
use tokio_util::sync::CancellationToken;
use validator::Validate;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};

/// Entry point for every user action on the library.
///
/// Holds the database pool, the event bus views subscribe to and the
/// metadata provider used for search and barcode lookups. Every write
/// publishes a [`LibraryEvent`] after it commits; rejected moves publish
/// nothing.
pub struct Booklog {
    pool: DbPool,
    events: Arc<EventBus>,
    metadata: Arc<dyn BookMetadataProvider>,
    default_board_name: String,
}

impl Booklog {
    pub fn new(
        pool: DbPool,
        events: Arc<EventBus>,
        metadata: Arc<dyn BookMetadataProvider>,
    ) -> Self {
        Self {
            pool,
            events,
            metadata,
            default_board_name: booklog_core::defaults::DEFAULT_BOARD_NAME.to_string(),
        }
    }

    /// Build the facade with a Google Books client honouring the
    /// configured URL and timeout.
    pub fn from_config(pool: DbPool, config: &AppConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .build()
            .map_err(MetadataError::from)?;
        let metadata = GoogleBooksApi::with_client(client, config.google_books_url.clone());

        Ok(Self::new(pool, Arc::new(EventBus::default()), Arc::new(metadata))
            .with_default_board_name(config.default_board_name.clone()))
    }

    pub fn with_default_board_name(mut self, name: impl Into<String>) -> Self {
        self.default_board_name = name.into();
        self
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    // -----------------------------------------------------------------------
    // Boards
    // -----------------------------------------------------------------------

    /// Return the first board, creating the default one on an empty store.
    pub async fn ensure_default_board(&self) -> AppResult<Board> {
        if let Some(first) = BoardRepo::list(&self.pool).await?.into_iter().next() {
            return Ok(first);
        }
        let created = self.create_board(&self.default_board_name).await?;
        tracing::info!(
            board_id = %created.board.id,
            name = %created.board.name,
            "Created default board"
        );
        Ok(created.board)
    }

    pub async fn boards(&self) -> AppResult<Vec<Board>> {
        Ok(BoardRepo::list(&self.pool).await?)
    }

    pub async fn board(&self, id: DbId) -> AppResult<BoardWithStatuses> {
        BoardRepo::find_with_statuses(&self.pool, id)
            .await?
            .ok_or_else(|| not_found("board", id))
    }

    /// Create a board at the end of the board list with the default statuses.
    pub async fn create_board(&self, name: &str) -> AppResult<BoardWithStatuses> {
        let input = CreateBoard {
            name: name.trim().to_string(),
        };
        validate(&input)?;

        let created = BoardRepo::create(&self.pool, &input).await?;
        self.publish(
            event_types::BOARD_CREATED,
            EntityKind::Board,
            created.board.id,
            [BOARD_LIST_ID],
        );
        Ok(created)
    }

    pub async fn rename_board(&self, id: DbId, name: &str) -> AppResult<Board> {
        let input = UpdateBoard {
            name: Some(name.trim().to_string()),
        };
        validate(&input)?;

        let board = BoardRepo::update(&self.pool, id, &input)
            .await?
            .ok_or_else(|| not_found("board", id))?;
        self.publish(event_types::BOARD_UPDATED, EntityKind::Board, id, [BOARD_LIST_ID]);
        Ok(board)
    }

    /// Delete a board and everything on it.
    ///
    /// Returns the board to select next: the first remaining one, or
    /// `None` when the list is now empty.
    pub async fn delete_board(&self, id: DbId) -> AppResult<Option<Board>> {
        if !BoardRepo::delete(&self.pool, id).await? {
            return Err(not_found("board", id));
        }
        self.publish(event_types::BOARD_DELETED, EntityKind::Board, id, [BOARD_LIST_ID]);

        let next = BoardRepo::list(&self.pool).await?.into_iter().next();
        Ok(next)
    }

    pub async fn move_board(
        &self,
        source: DbId,
        destination: Option<DbId>,
        insert_at_end: bool,
    ) -> AppResult<MoveOutcome> {
        let outcome =
            BoardRepo::move_board(&self.pool, source, destination, insert_at_end).await?;
        self.publish_move(event_types::BOARDS_REORDERED, EntityKind::Board, source, &outcome);
        Ok(outcome)
    }

    // -----------------------------------------------------------------------
    // Statuses
    // -----------------------------------------------------------------------

    pub async fn statuses(&self, board_id: DbId) -> AppResult<Vec<Status>> {
        Ok(StatusRepo::list_by_board(&self.pool, board_id).await?)
    }

    /// Append a status to a board. `color` may carry a leading `#`.
    pub async fn add_status(&self, board_id: DbId, title: &str, color: &str) -> AppResult<Status> {
        let input = CreateStatus {
            board_id,
            title: title.trim().to_string(),
            color: normalize_hex(color)?,
        };
        validate(&input)?;
        if BoardRepo::find_by_id(&self.pool, board_id).await?.is_none() {
            return Err(not_found("board", board_id));
        }

        let status = StatusRepo::create(&self.pool, &input).await?;
        self.publish(event_types::STATUS_CREATED, EntityKind::Status, status.id, [board_id]);
        Ok(status)
    }

    pub async fn update_status(&self, id: DbId, mut input: UpdateStatus) -> AppResult<Status> {
        if let Some(color) = input.color.as_deref() {
            input.color = Some(normalize_hex(color)?);
        }
        validate(&input)?;

        let status = StatusRepo::update(&self.pool, id, &input)
            .await?
            .ok_or_else(|| not_found("status", id))?;
        self.publish(event_types::STATUS_UPDATED, EntityKind::Status, id, [status.board_id]);
        Ok(status)
    }

    /// Delete a status with all of its books.
    pub async fn delete_status(&self, id: DbId) -> AppResult<()> {
        let status = StatusRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| not_found("status", id))?;
        if !StatusRepo::delete(&self.pool, id).await? {
            return Err(not_found("status", id));
        }
        self.publish(event_types::STATUS_DELETED, EntityKind::Status, id, [status.board_id]);
        Ok(())
    }

    pub async fn move_status(&self, request: &MoveRequest<DbId>) -> AppResult<MoveOutcome> {
        let outcome = StatusRepo::move_status(&self.pool, request).await?;
        self.publish_move(
            event_types::STATUS_MOVED,
            EntityKind::Status,
            request.source_item,
            &outcome,
        );
        Ok(outcome)
    }

    // -----------------------------------------------------------------------
    // Books
    // -----------------------------------------------------------------------

    pub async fn books(&self, status_id: DbId) -> AppResult<Vec<Book>> {
        Ok(BookRepo::list_by_status(&self.pool, status_id).await?)
    }

    pub async fn book(&self, id: DbId) -> AppResult<Book> {
        BookRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| not_found("book", id))
    }

    /// Append a book to the end of its status.
    pub async fn add_book(&self, mut input: CreateBook) -> AppResult<Book> {
        input.title = input.title.trim().to_string();
        validate(&input)?;
        if let Some(progress) = input.progress {
            ReadProgress::new(progress.current_page, progress.total_page)?;
        }
        if StatusRepo::find_by_id(&self.pool, input.status_id).await?.is_none() {
            return Err(not_found("status", input.status_id));
        }

        let book = BookRepo::create(&self.pool, &input).await?;
        self.publish(event_types::BOOK_CREATED, EntityKind::Book, book.id, [book.status_id]);
        Ok(book)
    }

    /// Append a book built from a search or scan result.
    pub async fn add_book_from_metadata(
        &self,
        status_id: DbId,
        metadata: &BookMetadata,
    ) -> AppResult<Book> {
        self.add_book(CreateBook {
            status_id,
            title: metadata.title.clone(),
            authors: metadata.authors.clone(),
            publisher: metadata.publisher.clone(),
            published_date: metadata.published_date.clone(),
            description: metadata.description.clone(),
            small_thumbnail: metadata.small_thumbnail.clone(),
            thumbnail: metadata.thumbnail.clone(),
            ..Default::default()
        })
        .await
    }

    pub async fn update_book(&self, id: DbId, input: UpdateBook) -> AppResult<Book> {
        validate(&input)?;
        let book = BookRepo::update(&self.pool, id, &input)
            .await?
            .ok_or_else(|| not_found("book", id))?;
        self.publish_book_updated(&book);
        Ok(book)
    }

    pub async fn set_progress(
        &self,
        id: DbId,
        progress: Option<ReadProgress>,
    ) -> AppResult<Book> {
        if let Some(progress) = progress {
            ReadProgress::new(progress.current_page, progress.total_page)?;
        }
        let book = BookRepo::set_progress(&self.pool, id, progress)
            .await?
            .ok_or_else(|| not_found("book", id))?;
        self.publish_book_updated(&book);
        Ok(book)
    }

    pub async fn set_deadline(&self, id: DbId, deadline: Option<Timestamp>) -> AppResult<Book> {
        let book = BookRepo::set_deadline(&self.pool, id, deadline)
            .await?
            .ok_or_else(|| not_found("book", id))?;
        self.publish_book_updated(&book);
        Ok(book)
    }

    /// Books with a deadline before `before`, soonest first.
    pub async fn books_due_before(&self, before: Timestamp) -> AppResult<Vec<Book>> {
        Ok(BookRepo::list_due_before(&self.pool, before).await?)
    }

    pub async fn delete_book(&self, id: DbId) -> AppResult<()> {
        let book = self.book(id).await?;
        if !BookRepo::delete(&self.pool, id).await? {
            return Err(not_found("book", id));
        }
        self.publish(event_types::BOOK_DELETED, EntityKind::Book, id, [book.status_id]);
        Ok(())
    }

    /// Remove every book of a status. Returns how many were removed.
    pub async fn delete_all_books(&self, status_id: DbId) -> AppResult<u64> {
        let removed = BookRepo::delete_all_in_status(&self.pool, status_id).await?;
        if removed > 0 {
            self.publish(
                event_types::BOOK_DELETED,
                EntityKind::Status,
                status_id,
                [status_id],
            );
        }
        Ok(removed)
    }

    pub async fn move_book(&self, request: &MoveRequest<DbId>) -> AppResult<MoveOutcome> {
        let outcome = BookRepo::move_book(&self.pool, request).await?;
        self.publish_move(
            event_types::BOOK_MOVED,
            EntityKind::Book,
            request.source_item,
            &outcome,
        );
        Ok(outcome)
    }

    /// Handle a drop on a target accepting `target` payloads.
    ///
    /// Returns `true` when something moved. Foreign payloads, payloads of
    /// the wrong kind and rejected moves return `false` and write nothing.
    pub async fn handle_drop(
        &self,
        target: DragKind,
        payload: &str,
        destination_item: Option<DbId>,
        destination_container: DbId,
        insert_at_end: bool,
    ) -> AppResult<bool> {
        let payload = match DragPayload::decode(payload) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::debug!(error = %err, "Ignoring unrecognised drop");
                return Ok(false);
            }
        };
        if payload.kind != target {
            tracing::debug!(kind = ?payload.kind, ?target, "Ignoring drop of the wrong kind");
            return Ok(false);
        }

        let request =
            payload.into_move_request(destination_item, destination_container, insert_at_end);
        let outcome = match payload.kind {
            DragKind::Book => self.move_book(&request).await?,
            DragKind::Status => self.move_status(&request).await?,
        };
        Ok(outcome.is_moved())
    }

    // -----------------------------------------------------------------------
    // Tags
    // -----------------------------------------------------------------------

    pub async fn tags(&self) -> AppResult<Vec<Tag>> {
        Ok(TagRepo::list(&self.pool).await?)
    }

    /// Create a tag; without a colour one is picked at random.
    pub async fn create_tag(&self, name: &str, color: Option<&str>) -> AppResult<Tag> {
        let input = CreateTag {
            name: name.trim().to_string(),
            color: color.map(normalize_hex).transpose()?,
        };
        validate(&input)?;

        let tag = TagRepo::create(&self.pool, &input).await?;
        self.publish(event_types::TAG_CHANGED, EntityKind::Tag, tag.id, []);
        Ok(tag)
    }

    pub async fn update_tag(&self, id: DbId, mut input: UpdateTag) -> AppResult<Tag> {
        if let Some(color) = input.color.as_deref() {
            input.color = Some(normalize_hex(color)?);
        }
        validate(&input)?;

        let tag = TagRepo::update(&self.pool, id, &input)
            .await?
            .ok_or_else(|| not_found("tag", id))?;
        self.publish(event_types::TAG_CHANGED, EntityKind::Tag, id, []);
        Ok(tag)
    }

    pub async fn delete_tag(&self, id: DbId) -> AppResult<()> {
        if !TagRepo::delete(&self.pool, id).await? {
            return Err(not_found("tag", id));
        }
        self.publish(event_types::TAG_CHANGED, EntityKind::Tag, id, []);
        Ok(())
    }

    pub async fn tags_for_book(&self, book_id: DbId) -> AppResult<Vec<Tag>> {
        Ok(BookRepo::tags_for_book(&self.pool, book_id).await?)
    }

    pub async fn books_for_tag(&self, tag_id: DbId) -> AppResult<Vec<Book>> {
        Ok(TagRepo::books_for_tag(&self.pool, tag_id).await?)
    }

    /// Attach or detach a tag. Returns whether the tag is now attached.
    pub async fn toggle_tag(&self, book_id: DbId, tag_id: DbId) -> AppResult<bool> {
        let book = self.book(book_id).await?;
        if TagRepo::find_by_id(&self.pool, tag_id).await?.is_none() {
            return Err(not_found("tag", tag_id));
        }

        let attached = BookRepo::toggle_tag(&self.pool, book_id, tag_id).await?;
        self.publish(
            event_types::BOOK_UPDATED,
            EntityKind::Book,
            book_id,
            [book.status_id, book_id],
        );
        Ok(attached)
    }

    // -----------------------------------------------------------------------
    // Comments
    // -----------------------------------------------------------------------

    pub async fn comments(&self, book_id: DbId) -> AppResult<Vec<Comment>> {
        Ok(CommentRepo::list_by_book(&self.pool, book_id).await?)
    }

    pub async fn add_comment(&self, book_id: DbId, text: &str) -> AppResult<Comment> {
        let input = CreateComment {
            book_id,
            text: text.trim().to_string(),
        };
        validate(&input)?;
        self.book(book_id).await?;

        let comment = CommentRepo::create(&self.pool, &input).await?;
        self.publish(event_types::COMMENT_CHANGED, EntityKind::Comment, comment.id, [book_id]);
        Ok(comment)
    }

    pub async fn update_comment(&self, id: DbId, text: &str) -> AppResult<Comment> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CoreError::Validation("Comment cannot be empty".into()).into());
        }
        let comment = CommentRepo::update(&self.pool, id, text)
            .await?
            .ok_or_else(|| not_found("comment", id))?;
        self.publish(event_types::COMMENT_CHANGED, EntityKind::Comment, id, [comment.book_id]);
        Ok(comment)
    }

    pub async fn delete_comment(&self, id: DbId) -> AppResult<()> {
        let book_id = CommentRepo::delete(&self.pool, id)
            .await?
            .ok_or_else(|| not_found("comment", id))?;
        self.publish(event_types::COMMENT_CHANGED, EntityKind::Comment, id, [book_id]);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Metadata lookups
    // -----------------------------------------------------------------------

    /// Search the metadata provider by keyword.
    pub async fn search_books(&self, keyword: &str) -> AppResult<Vec<BookMetadata>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(CoreError::Validation("Enter a keyword to search for".into()).into());
        }
        Ok(self.metadata.search(keyword).await?)
    }

    /// Look up a scanned barcode.
    ///
    /// Payloads that are not ISBNs yield `Ok(None)` so the scanner keeps
    /// looking. Cancelling `cancel` (the scanner view went away) abandons
    /// the request and also yields `Ok(None)`.
    pub async fn lookup_scanned(
        &self,
        payload: &str,
        cancel: CancellationToken,
    ) -> AppResult<Option<BookMetadata>> {
        let Some(isbn) = barcode::accept_payload(payload) else {
            tracing::trace!(payload, "Ignoring non-ISBN barcode");
            return Ok(None);
        };

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(%isbn, "ISBN lookup cancelled");
                Ok(None)
            }
            result = self.metadata.lookup_isbn(&isbn) => Ok(Some(result?)),
        }
    }

    // ---- private helpers ----

    fn publish(
        &self,
        event_type: &str,
        entity: EntityKind,
        id: DbId,
        containers: impl IntoIterator<Item = DbId>,
    ) {
        self.events
            .publish(LibraryEvent::new(event_type, entity, id).with_containers(containers));
    }

    fn publish_book_updated(&self, book: &Book) {
        self.publish(event_types::BOOK_UPDATED, EntityKind::Book, book.id, [book.status_id]);
    }

    /// Announce a committed move with the containers views must re-fetch.
    fn publish_move(
        &self,
        event_type: &str,
        entity: EntityKind,
        item: DbId,
        outcome: &MoveOutcome,
    ) {
        if outcome.is_moved() {
            self.publish(event_type, entity, item, outcome.affected_containers());
        }
    }
}

fn validate<T: Validate>(input: &T) -> Result<(), AppError> {
    input.validate().map_err(CoreError::from)?;
    Ok(())
}

fn not_found(entity: &'static str, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity, id })
}
