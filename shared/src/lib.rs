//! Shared building blocks for the store and faculty servers
//!
//! - [`error`]: error codes, `AppError`, JSON error bodies (and the sqlx bridge behind `db`)
//! - [`session`]: signed cookie sessions with flash messages
//! - [`html`]: page layout and escaping for server-rendered views
//! - [`models`]: domain entities of both applications
//! - [`validation`]: form/JSON input checks
//! - [`util`]: date helpers

pub mod error;
pub mod html;
pub mod models;
pub mod session;
pub mod util;
pub mod validation;

pub use error::{AppError, AppResult, ErrorCode};
