//! Data models
//!
//! Shared between both servers and their JSON API.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (INTEGER PRIMARY KEY / BIGSERIAL).

pub mod customer;
pub mod game;
pub mod order;
pub mod rental;
pub mod student;

// Re-exports
pub use customer::*;
pub use game::*;
pub use order::*;
pub use rental::*;
pub use student::*;
