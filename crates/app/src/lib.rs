//! Booklog application layer.
//!
//! [`Booklog`] is the facade the UI talks to: one method per user gesture,
//! each validating its input, running the matching repository call and
//! publishing a [`LibraryEvent`](booklog_events::LibraryEvent) once the
//! write has committed.

pub mod booklog;
pub mod config;
pub mod error;

pub use booklog::Booklog;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
