//! Domain types and pure logic for the Booklog reading board.
//!
//! Nothing in this crate touches the database or the network. The
//! persistence layer (`booklog-db`) and the application facade
//! (`booklog-app`) build on these modules:
//!
//! - [`reorder`]: contiguous-priority planning for moves, inserts and deletes.
//! - [`drag`]: drag-and-drop payloads exchanged with the UI surface.
//! - [`barcode`]: filtering scanned payloads into ISBNs.
//! - [`color`]: hex colour parsing and random tag colours.
//! - [`progress`]: reading progress arithmetic.
//! - [`defaults`]: the statuses every new board starts with.

pub mod barcode;
pub mod color;
pub mod defaults;
pub mod drag;
pub mod error;
pub mod progress;
pub mod reorder;
pub mod types;
