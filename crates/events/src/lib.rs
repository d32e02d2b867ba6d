//! In-process change notifications for Booklog.
//!
//! - [`EventBus`]: publish/subscribe hub backed by `tokio::sync::broadcast`.
//! - [`LibraryEvent`]: the event envelope published after every committed
//!   mutation, so views showing the affected containers can re-fetch.
//! - [`event_types`]: the dot-separated event names in use.

pub mod bus;
pub mod event_types;

pub use bus::{EntityKind, EventBus, LibraryEvent};
