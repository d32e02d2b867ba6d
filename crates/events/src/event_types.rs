//! Event names published on the [`EventBus`](crate::EventBus).

pub const BOARD_CREATED: &str = "board.created";
pub const BOARD_UPDATED: &str = "board.updated";
pub const BOARD_DELETED: &str = "board.deleted";
pub const BOARDS_REORDERED: &str = "board.reordered";

pub const STATUS_CREATED: &str = "status.created";
pub const STATUS_UPDATED: &str = "status.updated";
pub const STATUS_DELETED: &str = "status.deleted";
/// A status changed position; `containers` lists the affected boards.
pub const STATUS_MOVED: &str = "status.moved";

pub const BOOK_CREATED: &str = "book.created";
pub const BOOK_UPDATED: &str = "book.updated";
pub const BOOK_DELETED: &str = "book.deleted";
/// A book changed position; `containers` lists the affected statuses.
pub const BOOK_MOVED: &str = "book.moved";

pub const TAG_CHANGED: &str = "tag.changed";
pub const COMMENT_CHANGED: &str = "comment.changed";
