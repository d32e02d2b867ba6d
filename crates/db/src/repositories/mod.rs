//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&SqlitePool` as the first argument.

pub mod board_repo;
pub mod book_repo;
pub mod comment_repo;
pub mod order_repo;
pub mod status_repo;
pub mod tag_repo;

pub use board_repo::BoardRepo;
pub use book_repo::BookRepo;
pub use comment_repo::CommentRepo;
pub use order_repo::{MoveOutcome, OrderRepo, OrderedKind, BOARD_LIST_ID};
pub use status_repo::StatusRepo;
pub use tag_repo::TagRepo;
