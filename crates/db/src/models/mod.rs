//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts, validated with `validator`
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod board;
pub mod book;
pub mod comment;
pub mod status;
pub mod tag;
